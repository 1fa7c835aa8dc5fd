//! `mina onboard` — First-time setup: create the config directory and a
//! commented starter file.

use mina_config::AppConfig;

pub async fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("💎 MINA — Prima configurazione");
    println!("==============================");
    println!();

    if config_dir.exists() {
        println!("  Directory esistente: {}", config_dir.display());
    } else {
        std::fs::create_dir_all(&config_dir)?;
        println!("  ✅ Creata la directory: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!();
        println!("  ⚠️  La configurazione esiste già: {}", config_path.display());
        println!("     Modificala a mano, oppure rilancia con --force per sovrascriverla.");
        println!();
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("  ✅ Scritto {}", config_path.display());

    println!();
    println!("  📝 Prossimi passi:");
    println!("     1. Ottieni una API key gratuita su https://console.groq.com");
    println!("     2. Esportala: export GROQ_API_KEY='gsk_...'");
    println!("        (oppure scrivila come `api_key` nel file di configurazione)");
    println!("     3. Avvia: mina chat");
    println!();
    println!("  🎉 Fatto! MINA ti aspetta.");
    println!();

    Ok(())
}
