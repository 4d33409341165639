#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    onboarding_backend::run().await;
}
