use blend_calc::config::cli::{BlendArgs, Command, ShellArgs};
use blend_calc::core::session::DEFAULT_TARGET_STRENGTH;
use blend_calc::utils::error::{BlendError, ErrorSeverity};
use blend_calc::utils::format::{format_degrees, format_liters, format_number};
use blend_calc::utils::{logger, validation::Validate};
use blend_calc::{
    Blend, BlendJob, BlendRunner, BlendSession, BlendShell, Calculation, CalculationRequest, CliConfig,
    LocalStorage,
};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_logger(config.log_format, config.verbose);

    tracing::info!("Starting blend-calc");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match &config.command {
        Command::Strength(args) => calculate(args, Mode::Strength).await,
        Command::Dilute(args) => calculate(&args.blend, Mode::Dilute(args.target)).await,
        Command::Shell(args) => run_shell(args).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "Calculation failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,      // advisory only
            ErrorSeverity::Medium => 2,   // bad input
            ErrorSeverity::High => 1,     // bad configuration
            ErrorSeverity::Critical => 3, // could not write output
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

enum Mode {
    Strength,
    /// Target from the command line, if given.
    Dilute(Option<f64>),
}

async fn calculate(args: &BlendArgs, mode: Mode) -> Result<(), BlendError> {
    let mut job = BlendJob::load(args.input.as_deref(), args.policy, args.report.number_style)?;
    args.report.apply(&mut job.report);
    job.report.validate()?;
    job.append_rows(&args.component_rows(job.report.number_style)?)?;

    let request = match mode {
        Mode::Strength => CalculationRequest::Strength,
        Mode::Dilute(target) => CalculationRequest::Dilution {
            target_strength: target
                .or(job.target_strength)
                .unwrap_or(DEFAULT_TARGET_STRENGTH),
        },
    };

    let storage = LocalStorage::new(job.report.output_path.clone());
    let runner = BlendRunner::new(storage);
    let mut session = BlendSession::new(job.blend);
    let outcome = runner
        .run(&mut session, request, &job.report, args.report.report)
        .await?;

    let style = job.report.number_style;
    println!("Blend: {}", job.name);
    match outcome.calculation {
        Calculation::Strength(r) => {
            println!("  Total volume:         {}", format_liters(r.total_volume, style));
            println!("  Total LAA:            {}", format_number(r.total_pure_alcohol, 2, style));
            println!("  Final strength (Cf):  {}", format_degrees(r.final_strength, style));
        }
        Calculation::Dilution(r) => {
            println!("  Total volume:         {}", format_liters(r.total_volume, style));
            println!("  Total LAA:            {}", format_number(r.total_pure_alcohol, 2, style));
            println!("  Target strength:      {}", format_degrees(r.target_strength, style));
            println!("  Water to add (Va):    {}", format_liters(r.water_to_add, style));
            println!("  Final volume (Vf):    {}", format_liters(r.final_volume_needed, style));
            if !r.is_reachable() {
                println!(
                    "  ⚠️  Already at or below {}: adding water cannot reach it, only more alcohol can",
                    format_degrees(r.target_strength, style)
                );
            }
        }
    }

    for name in &outcome.written {
        println!("📁 Report saved to: {}/{}", job.report.output_path, name);
    }
    Ok(())
}

async fn run_shell(args: &ShellArgs) -> Result<(), BlendError> {
    let mut job = BlendJob::load(args.input.as_deref(), args.policy, args.report.number_style)?;
    if args.input.is_none() {
        job.blend = Blend::default_seed();
    }
    args.report.apply(&mut job.report);
    job.report.validate()?;

    let mut session = BlendSession::new(job.blend);
    if let Some(target) = job.target_strength {
        session.set_target_strength(target);
    }

    let storage = LocalStorage::new(job.report.output_path.clone());
    let mut shell = BlendShell::new(session, job.policy, job.report, storage);
    let stdin = std::io::stdin();
    shell.run(stdin.lock(), std::io::stdout()).await
}
