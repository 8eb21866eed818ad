use clap::Parser;
use itinerary_planner::core::route::Route;
use itinerary_planner::utils::error::ErrorSeverity;
use itinerary_planner::utils::{logger, validation::Validate};
use itinerary_planner::{
    chat_provider, CliConfig, Command, GoogleMaps, PlannerConfig, PlannerError, PlannerSession,
    Pools,
};

fn print_pools(pools: &Pools, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(pools)?);
        return Ok(());
    }

    println!("🗓  Itinerary");
    for (index, item) in pools.itinerary().iter().enumerate() {
        println!("  {}. {} [{}] - {}", index, item.title, item.date, item.description);
    }
    println!("📌 Candidates");
    for (index, item) in pools.candidates().iter().enumerate() {
        println!("  {}. {} - {}", index, item.title, item.description);
    }
    Ok(())
}

fn print_route(route: &Route) {
    for leg in &route.legs {
        println!(
            "  {} → {}: {:.1} km, {} min",
            leg.start_address,
            leg.end_address,
            leg.distance_meters as f64 / 1000.0,
            leg.duration_seconds / 60
        );
    }
    println!(
        "  Total: {:.1} km, {} min",
        route.total_distance_meters() as f64 / 1000.0,
        route.total_duration_seconds() / 60
    );
}

fn exit_code(error: &PlannerError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

async fn run(cli: &CliConfig, config: &PlannerConfig) -> Result<(), PlannerError> {
    let travel_mode = cli.travel_mode.unwrap_or_else(|| config.travel_mode());
    let mut session = PlannerSession::new(config.initial_pools()?).with_travel_mode(travel_mode);

    match &cli.command {
        Command::Show => {}
        Command::Plan { gestures } => {
            for gesture in gestures {
                let outcome = session.on_drag_end(gesture)?;
                tracing::info!("✅ {:?}", outcome);
            }
        }
        Command::Add { query } => {
            let maps = GoogleMaps::from_config(config, config.maps_timeout())?;
            session.discover_place(&maps, query).await?;
        }
        Command::Route => {
            let maps = GoogleMaps::from_config(config, config.maps_timeout())?;
            if let Some(center) = session.map_center() {
                println!("🗺  Map centre: {}", center);
            }
            match session.plan_route(&maps).await? {
                Some(route) => print_route(&route),
                None => println!("Add at least two located stops to plan a route"),
            }
        }
        Command::Chat { message, accept } => {
            let chat = chat_provider(config)?;
            let reply = session.send_chat(chat.as_ref(), message).await?;
            println!("🤖 {}", reply);

            if !accept.is_empty() {
                let maps = GoogleMaps::from_config(config, config.maps_timeout())?;
                for name in accept {
                    if let Err(e) = session.accept_suggestion(&maps, name).await {
                        tracing::warn!("Could not add '{}': {}", name, e);
                    }
                }
            }
        }
    }

    for notice in session.take_notifications() {
        eprintln!("🔔 {}", notice.message);
    }
    if let Err(e) = print_pools(session.pools(), cli.json) {
        tracing::error!("Failed to print pools: {}", e);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("🚀 Starting itinerary planner");
    tracing::debug!("CLI config: {:?}", cli);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            PlannerConfig::from_file(path)?
        }
        None => PlannerConfig::default(),
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Planner command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let code = exit_code(&e);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}
