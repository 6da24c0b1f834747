#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    legaldoc_server::run().await
}
