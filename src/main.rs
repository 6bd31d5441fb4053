#[tokio::main]
async fn main() {
    if let Err(err) = latentsense::mcp::server::run_stdio().await {
        eprintln!("latentsense: {}", err);
        std::process::exit(1);
    }
}
