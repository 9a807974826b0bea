#[tokio::main]
async fn main() {
    smo::start().await;
}
