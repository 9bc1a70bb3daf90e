mod cli;

use trackforge::{
    batch::ConvertJob,
    commit::{EditLedger, PendingField, PendingValue},
    config,
    services::Services,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, EditArgs};
use std::path::{Path, PathBuf};
use tf_av::{default_destination, Prober};
use tf_probe::{StereoMode, StreamSet, StreamView};

fn main() {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "trackforge=trace,tf_av=debug,tf_probe=debug,tf_core=debug".to_string()
        } else {
            "trackforge=info,tf_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        if let Some(diagnostics) = e
            .downcast_ref::<tf_core::Error>()
            .and_then(tf_core::Error::diagnostics)
        {
            eprintln!("{}", diagnostics);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Probe { files, json, raw } => {
            probe_files(&files, cli.config.as_deref(), json, raw)
        }
        Commands::Convert {
            sources,
            output_dir,
        } => convert_files(&sources, output_dir.as_deref(), cli.config.as_deref()),
        Commands::Edit(args) => edit_file(args, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("trackforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn services(config_path: Option<&Path>) -> Result<Services> {
    let config = config::load_config_or_default(config_path)?;
    Services::from_config(config)
}

fn probe_files(files: &[PathBuf], config_path: Option<&Path>, json: bool, raw: bool) -> Result<()> {
    let services = services(config_path)?;

    if raw {
        let mut dumps = Vec::new();
        for file in files {
            let sections = services
                .prober
                .probe_sections(file)
                .with_context(|| format!("Failed to probe {}", file.display()))?;
            dumps.push((file, sections));
        }
        if json {
            println!("{}", serde_json::to_string_pretty(&dumps)?);
        } else {
            for (file, sections) in &dumps {
                println!("File: {}", file.display());
                for section in sections {
                    println!("\n{}", section.header);
                    for (key, value) in section.fields.entries() {
                        println!("  {key:<40}: {value}");
                    }
                }
                println!();
            }
        }
        return Ok(());
    }

    let media_files: Vec<_> = files.iter().map(|f| services.media_file(f)).collect();
    let results = services.pools.probe_all(&media_files);

    let mut summaries = Vec::new();
    for (file, result) in files.iter().zip(results) {
        let streams = result.with_context(|| format!("Failed to probe {}", file.display()))?;
        summaries.push((file, streams));
    }

    if json {
        let out: Vec<_> = summaries
            .iter()
            .map(|(file, streams)| {
                serde_json::json!({
                    "file": file,
                    "streams": streams.summary(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (file, streams) in &summaries {
            print_streams(file, streams);
        }
    }

    Ok(())
}

fn print_streams(file: &Path, streams: &StreamSet) {
    println!("File: {}", file.display());
    if let Some(general) = streams.general() {
        if let Some(format) = general.format() {
            println!("Container: {}", format);
        }
        if let Some(title) = general.movie_title() {
            println!("Title: {}", title);
        }
        if let Some(size) = general.file_size() {
            println!("Size: {} bytes", size);
        }
        if let Some(ms) = general.duration_ms() {
            let secs = (ms / 1000.0) as u64;
            println!("Duration: {:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
        }
    }

    println!("\nVideo Tracks: {}", streams.videos().count());
    for (i, track) in streams.videos().enumerate() {
        print!(
            "  [{}] {} {}x{}",
            i,
            track.format().unwrap_or_default(),
            track.width().unwrap_or(0),
            track.height().unwrap_or(0)
        );
        if let Some(fps) = track.frame_rate() {
            print!(", {:.3} fps", fps);
        }
        if let Some(bits) = track.bit_depth() {
            print!(", {} bit", bits);
        }
        if let Some(name) = track.title().filter(|t| !t.is_empty()) {
            print!(" \"{}\"", name);
        }
        println!();
        if let Some(mode) = track.stereo_mode() {
            println!("      Stereo mode: {} ({:?})", mode, mode);
        }
    }

    println!("\nAudio Tracks: {}", streams.audios().count());
    for (i, track) in streams.audios().enumerate() {
        print!("  [{}] {}", i, track.format().unwrap_or_default());
        if let Some(channels) = track.channels() {
            print!(" {}ch", channels);
        }
        if let Some(lang) = track.language() {
            print!(" ({})", lang);
        }
        if track.is_default() {
            print!(" [default]");
        }
        if track.is_forced() {
            print!(" [forced]");
        }
        println!();
    }
    println!();
}

fn convert_files(sources: &[PathBuf], output_dir: Option<&Path>, config_path: Option<&Path>) -> Result<()> {
    let services = services(config_path)?;

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let jobs: Vec<ConvertJob> = sources
        .iter()
        .map(|source| ConvertJob {
            source: source.clone(),
            destination: default_destination(source, output_dir),
        })
        .collect();

    let results = services.pools.convert_all(&services.converter, &jobs, &|source, pct| {
        println!("{}: {}%", source.display(), pct);
    });

    let mut failures = 0;
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(path) => println!("✓ {} -> {}", job.source.display(), path.display()),
            Err(e) => {
                failures += 1;
                println!("✗ {}: {}", job.source.display(), e);
                if let Some(diagnostics) = e.diagnostics() {
                    eprintln!("{}", diagnostics);
                }
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} conversions failed", failures, jobs.len());
    }
    Ok(())
}

fn edit_file(args: EditArgs, config_path: Option<&Path>) -> Result<()> {
    let services = services(config_path)?;
    let file = services.media_file(&args.file);
    let streams = file
        .streams()
        .with_context(|| format!("Failed to probe {}", args.file.display()))?;

    let mut ledger = EditLedger::new();

    if args.title.is_some() || args.clear_title {
        ledger.propose_against(PendingField::Title, PendingValue::Text(args.title), &streams);
    }
    if args.name.is_some() || args.clear_name {
        ledger.propose_against(PendingField::DisplayName, PendingValue::Text(args.name), &streams);
    }
    if args.stereo_mode.is_some() || args.clear_stereo_mode {
        let mode = args.stereo_mode.and_then(StereoMode::from_matroska_value);
        ledger.propose_against(PendingField::StereoMode, PendingValue::StereoMode(mode), &streams);
    }
    for (index, tag) in args.languages {
        let lang = tf_probe::language::to_language(&tag)
            .with_context(|| format!("Unrecognised language '{}'", tag))?;
        ledger.propose_against(PendingField::Language(index), PendingValue::Language(Some(lang)), &streams);
    }
    for (index, flag) in args.defaults {
        ledger.propose_against(PendingField::Default(index), PendingValue::Flag(Some(flag)), &streams);
    }

    if ledger.is_empty() {
        println!("Nothing to change in {}", args.file.display());
        return Ok(());
    }

    println!("Pending edits for {}:", args.file.display());
    for (field, value) in ledger.iter() {
        println!("  {}: {:?}", field, value);
    }

    let (outcome, _refreshed) = services.committer.commit(&file, &mut ledger);
    let succeeded = outcome.is_success();
    outcome.into_result(services.config.commit.on_exhausted)?;

    if succeeded {
        println!("✓ Changes written to {}", args.file.display());
    } else {
        println!("✗ Changes could not be written to {}", args.file.display());
    }
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let services = services(config_path)?;
    let tools = services.tools.check_all();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.tool);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        if let Some(ref error) = tool.error {
            print!(" [{}]", error);
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install them to enable all features.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    for tool in tf_core::Tool::ALL {
        match config.tools.path_for(tool) {
            Some(p) => println!("  {}: {}", tool, p.display()),
            None => println!("  {}: (PATH lookup)", tool),
        }
    }
    println!(
        "  Workers: probe={} edit={} convert={}",
        config.concurrency.probe_workers,
        config.concurrency.edit_workers,
        config.concurrency.convert_workers
    );
    println!(
        "  Commit: max_attempts={} on_exhausted={:?}",
        config.commit.max_attempts, config.commit.on_exhausted
    );

    Ok(())
}
