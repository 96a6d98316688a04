use async_trait::async_trait;
use kusari::prelude::*;

define_link!(LoadDataLink);

#[async_trait]
impl Link<String> for LoadDataLink {
    async fn execute(&self, cargo: &mut DataCargo<String>) -> Result<(), ChainError> {
        println!("Loading data...");
        cargo.payload_mut().push_str("sample data");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut chain = Chain::<String>::builder()
        .add_link(LoadDataLink)
        .add_fn(|cargo| {
            println!("Annotating data...");
            cargo.payload_mut().push_str(" (checked)");
            Ok(())
        })
        .build()?;

    chain.on_completed(|payload| println!("Chain completed with: {payload}"));
    chain.on_error(|_payload, error| println!("Chain failed: {error}"));

    chain.run().await;

    Ok(())
}
