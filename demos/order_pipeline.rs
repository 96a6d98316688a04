use async_trait::async_trait;
use kusari::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderItem {
    product_id: String,
    quantity: u32,
    price: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Order {
    id: String,
    items: Vec<OrderItem>,
    total_amount: f64,
    validated: bool,
    payment_reference: Option<String>,
}

// Link 1: Order Validation
define_link!(ValidateOrderLink);

#[async_trait]
impl Link<Order> for ValidateOrderLink {
    async fn execute(&self, cargo: &mut DataCargo<Order>) -> Result<(), ChainError> {
        println!("Validating order...");

        let order = cargo.payload_mut();
        if order.items.is_empty() {
            return Err(ChainError::LinkFailed {
                link_name: self.name(),
                details: "Order must contain at least one item".to_string(),
            });
        }
        if order.total_amount <= 0.0 {
            return Err(ChainError::LinkFailed {
                link_name: self.name(),
                details: "Invalid order amount".to_string(),
            });
        }

        order.validated = true;
        Ok(())
    }
}

// Link 2: Payment. The gateway is flaky, so the chain runs with a retry
// budget; the first attempt always fails.
struct ChargePaymentLink {
    gateway_calls: Arc<AtomicU32>,
}

#[async_trait]
impl Link<Order> for ChargePaymentLink {
    async fn execute(&self, cargo: &mut DataCargo<Order>) -> Result<(), ChainError> {
        println!("Charging payment...");

        if self.gateway_calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(ChainError::LinkFailed {
                link_name: self.name(),
                details: "Payment gateway timeout".to_string(),
            });
        }

        let order = cargo.payload_mut();
        order.payment_reference = Some(format!("PAY-{}", order.id));
        Ok(())
    }
}

// Link 3: Shipping, resolved by name from the registry.
define_link!(ShipOrderLink);

#[async_trait]
impl Link<Order> for ShipOrderLink {
    async fn execute(&self, cargo: &mut DataCargo<Order>) -> Result<(), ChainError> {
        let order = cargo.payload_mut();
        if order.payment_reference.is_none() {
            // Unpaid orders stop the chain without failing it.
            println!("Order unpaid, skipping shipment");
            cargo.cancel();
            return Ok(());
        }

        println!("Shipping order {}...", order.id);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let order = Order {
        id: "ORD-001".to_string(),
        items: vec![OrderItem {
            product_id: "PROD-1".to_string(),
            quantity: 2,
            price: 29.99,
        }],
        total_amount: 59.98,
        ..Order::default()
    };

    let registry = Arc::new(LinkRegistry::new().register::<ShipOrderLink>());

    let mut chain = Chain::builder_with(order)
        .config(Configuration::retry(3))
        .registry(registry)
        .add_link(ValidateOrderLink)
        .add_link(ChargePaymentLink {
            gateway_calls: Arc::new(AtomicU32::new(0)),
        })
        .add_link_by_name("ShipOrderLink")
        .build()?;

    chain.on_completed(|order| {
        println!(
            "Order {} processed, payment {}",
            order.id,
            order.payment_reference.as_deref().unwrap_or("missing")
        );
    });
    chain.on_error(|order, error| {
        println!("Order {} attempt failed: {}", order.id, error);
    });

    chain.run().await;

    println!("Final order state: {:#?}", chain.into_payload());

    Ok(())
}
