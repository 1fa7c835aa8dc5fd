//! `mina chat` — Interactive terminal chat or single-message mode.

use std::io::{BufRead, Write};

use mina_chat::{Reply, ResponseRouter};
use mina_config::AppConfig;
use mina_core::{ASSISTANT_NAME, CompletionClient, ConversationLog, Personality};
use tracing::debug;

pub async fn run(
    message: Option<String>,
    personality: Option<String>,
    temperature: Option<f32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let mut active = match personality.as_deref() {
        Some(name) => Personality::from_name(name).ok_or_else(|| {
            format!(
                "Personalità sconosciuta '{name}' (disponibili: {})",
                Personality::ALL.map(|p| p.name()).join(", ")
            )
        })?,
        None => config.active_personality(),
    };

    let mut temperature = temperature.unwrap_or(config.temperature);
    if !(0.1..=2.0).contains(&temperature) {
        return Err(format!("La temperatura deve essere tra 0.1 e 2.0 (non {temperature})").into());
    }

    if !config.has_api_key() {
        print_api_key_warning();
    }

    let client = mina_providers::build_client(&config);
    debug!(
        backend = client.name(),
        model = %config.model,
        personality = active.name(),
        "Chat session starting"
    );
    let router = ResponseRouter::new(config.knowledge_base(), client);
    let mut log = ConversationLog::new();

    // Single message mode
    if let Some(message) = message {
        let message = message.trim();
        if message.is_empty() {
            return Err("Il messaggio è vuoto.".into());
        }
        let reply = answer(&router, &mut log, message, active, temperature).await;
        println!("{}", reply.display());
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║    💎 MINA — Il Tuo Assistente Personale     ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Modello:      {}", config.model);
    println!("  Personalità:  {}", active.name());
    println!("  Temperatura:  {temperature}");
    println!("  Conoscenze:   {} voci", router.knowledge().len());
    println!();
    println!("  Scrivi un messaggio e premi Invio. Comandi: /help");
    println!("  Esci con 'exit', 'quit' o Ctrl+C.");
    println!();

    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("  Tu > ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "exit" | "quit" | "/exit" | "/quit" => break,
            "/help" => {
                print_help();
                continue;
            }
            "/clear" => {
                log.clear();
                println!("  Cronologia cancellata!");
                println!();
                continue;
            }
            "/stats" => {
                println!();
                println!("  💬 Messaggi Totali: {}", log.len());
                println!("  🤖 Assistente:      {ASSISTANT_NAME}");
                println!("  🧠 Modello:         {}", config.model);
                println!("  🎭 Personalità:     {}", active.name());
                println!("  🌡️  Temperatura:     {temperature}");
                println!();
                continue;
            }
            _ => {}
        }

        if let Some(rest) = input.strip_prefix("/personalita") {
            let name = rest.trim();
            match Personality::from_name(name) {
                Some(p) => {
                    active = p;
                    println!("  🎭 Personalità cambiata: {}", p.name());
                }
                None => println!(
                    "  Personalità sconosciuta '{name}'. Disponibili: {}",
                    Personality::ALL.map(|p| p.name()).join(", ")
                ),
            }
            println!();
            continue;
        }

        if let Some(rest) = input.strip_prefix("/temperatura") {
            match rest.trim().parse::<f32>() {
                Ok(t) if (0.1..=2.0).contains(&t) => {
                    temperature = t;
                    println!("  🌡️  Temperatura impostata a {t}");
                }
                _ => println!("  La temperatura deve essere un numero tra 0.1 e 2.0."),
            }
            println!();
            continue;
        }

        if input.starts_with('/') {
            println!("  Comando sconosciuto: {input}. Prova /help.");
            println!();
            continue;
        }

        let reply = answer(&router, &mut log, input, active, temperature).await;
        println!();
        for line in reply.display().lines() {
            println!("  💎 MINA > {line}");
        }
        println!();
    }

    println!();
    println!("  A presto! 👋");
    println!();

    Ok(())
}

/// Route one message, showing a wait line while the backend works.
/// Knowledge-base hits answer instantly and skip the wait line.
async fn answer(
    router: &ResponseRouter,
    log: &mut ConversationLog,
    message: &str,
    personality: Personality,
    temperature: f32,
) -> Reply {
    let remote = router.knowledge().lookup(message).is_none();
    if remote {
        eprint!("  💎 MINA sta pensando...");
    }
    let reply = router.route(log, message, personality, temperature).await;
    if remote {
        eprint!("\r                            \r");
    }
    reply
}

fn print_api_key_warning() {
    eprintln!();
    eprintln!("  ⚠️  Nessuna API key configurata!");
    eprintln!();
    eprintln!("  Imposta la variabile d'ambiente:");
    eprintln!("    export GROQ_API_KEY='gsk_...'");
    eprintln!();
    eprintln!("  Oppure aggiungi `api_key` al file di configurazione:");
    eprintln!(
        "    {}",
        AppConfig::config_dir().join("config.toml").display()
    );
    eprintln!();
    eprintln!("  Ottieni una chiave gratuita su: https://console.groq.com");
    eprintln!();
    eprintln!("  La base di conoscenze risponde comunque; le altre domande");
    eprintln!("  riceveranno un errore finché la chiave non è configurata.");
    eprintln!();
}

fn print_help() {
    println!();
    println!("  Comandi disponibili:");
    println!("    /help                  Mostra questo aiuto");
    println!("    /clear                 Cancella la cronologia");
    println!("    /stats                 Statistiche della sessione");
    println!("    /personalita <nome>    Cambia personalità");
    println!("    /temperatura <valore>  Imposta la temperatura (0.1-2.0)");
    println!("    exit, quit             Esci");
    println!();
    println!("  Prova anche: \"chi sei\", \"cosa sai fare\", \"mina\".");
    println!();
}
