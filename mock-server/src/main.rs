use tokio::net::TcpListener;

/// Serves the fake endpoint until killed. `PORT` picks the port (8000).
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port: u16 = match std::env::var("PORT") {
        Ok(raw) => raw
            .parse()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("invalid PORT: {raw}")))?,
        Err(_) => 8000,
    };
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let addr = listener.local_addr()?;
    println!("Maconomy mock listening on http://{addr}{}", mock_server::RPC_PATH);
    println!(
        "Log in with {} / {}",
        mock_server::DEMO_USERNAME,
        mock_server::DEMO_PASSWORD
    );
    mock_server::run(listener).await
}
