/// Translation Tracer - Shows the flow through Tokens → Match → Node → Render
///
/// Usage: cargo run --bin trace_translate <from> <to> <text...>
///
/// Set `RUST_LOG=polyscript_semantic=trace` to see matcher decisions.
use polyscript_core::to_explicit;
use polyscript_semantic::{default_translator, PolyscriptResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("polyscript_semantic=debug,warn"));
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: cargo run --bin trace_translate <from> <to> <text...>");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_translate en ja toggle .active on #btn");
        eprintln!();
        eprintln!("Languages: {}", default_translator().supported_languages().join(", "));
        std::process::exit(1);
    }

    let (from, to) = (&args[1], &args[2]);
    let text = args[3..].join(" ");

    if let Err(e) = trace(&text, from, to) {
        println!("❌ {}", e);
        std::process::exit(1);
    }
}

fn trace(text: &str, from: &str, to: &str) -> PolyscriptResult<()> {
    let translator = default_translator();

    println!("╔═══════════════════════════════════════════════════════════════");
    println!("║ TRANSLATION TRACER ({} → {})", from, to);
    println!("╚═══════════════════════════════════════════════════════════════\n");

    println!("📝 INPUT:");
    println!("{}\n", text);

    println!("🔍 TOKENS:");
    println!("─────────────────────────────────────────────────────────────");
    for token in translator.tokenize(text, from)?.tokens() {
        println!("  {} (confidence {:.2})", token, token.confidence);
    }
    println!();

    println!("🎯 MATCHES:");
    println!("─────────────────────────────────────────────────────────────");
    let analysis = translator.analyze(text, from)?;
    for (index, step) in analysis.steps.iter().enumerate() {
        match &step.matched {
            Some(m) => println!("  step {}: {} ({:.3})", index + 1, m.pattern_id, m.confidence),
            None => println!("  step {}: no pattern", index + 1),
        }
    }
    println!("  threshold: {:.2}\n", analysis.threshold);

    let node = translator.parse(text, from)?;
    println!("🌳 NODE:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}", to_explicit(&node));
    if let Ok(json) = node.to_json().and_then(|v| serde_json::to_string_pretty(&v)) {
        println!("{}", json);
    }
    println!();

    println!("🔄 RENDERED:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}\n", translator.render(&node, to)?);

    println!("✅ Translation succeeded!");
    Ok(())
}
