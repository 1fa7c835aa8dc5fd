//! `mina serve` — Start the web chat gateway.

use mina_config::AppConfig;

pub async fn run(
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    println!("💎 MINA Gateway");
    println!("   In ascolto: http://{}:{}", config.gateway.host, config.gateway.port);
    println!("   Modello:    {}", config.model);
    if !config.has_api_key() {
        println!("   ⚠️  API key mancante: solo la base di conoscenze risponderà.");
    }
    println!();

    mina_gateway::serve(config).await?;

    Ok(())
}
