//! `mina doctor` — Diagnose the local setup.

use mina_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 MINA — Diagnostica");
    println!("=====================");
    println!();

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ File di configurazione: {}", config_path.display());
    } else {
        println!("  ⚠️  Nessun file di configurazione. Esegui `mina onboard`.");
        issues += 1;
    }

    match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configurazione valida");

            if config.has_api_key() {
                println!("  ✅ API key configurata");
            } else {
                println!("  ❌ API key mancante. Imposta GROQ_API_KEY o `api_key` nel file.");
                issues += 1;
            }

            println!("  ✅ Endpoint: {}", config.base_url);
            println!("  ✅ Modello: {}", config.model);
            println!("  ✅ Personalità attiva: {}", config.active_personality().name());
            println!("  ✅ Base di conoscenze: {} voci", config.knowledge_base().len());
        }
        Err(e) => {
            println!("  ❌ Configurazione non valida: {e}");
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 Tutto a posto!");
    } else {
        println!("  ⚠️  {issues} problema/i trovato/i. Vedi sopra per i dettagli.");
    }
    println!();

    Ok(())
}
