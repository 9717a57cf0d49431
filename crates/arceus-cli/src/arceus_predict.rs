//! Spawn prediction CLI
//!
//! Usage: arceus_predict <event> <args...> [--config <PATH>] [--tables <PATH>]
//!
//! Events:
//!   static <map> <spawner> <raw-seed>
//!   distortion <map> <group> <raw-seed>
//!   outbreak <species> <count> <raw-seed>
//!   mmo <map> <table-id> <bonus-table-id> <count> <bonus-count> <raw-seed>
//!
//! Example:
//!   arceus_predict outbreak Sneasel 10 0x1234ABCD5678EF00
//!   arceus_predict mmo coronet 0x5E8E0C0A2B9D1F11 0 10 0 0x1234 --tables mmo.lat
//!
//! Seeds and table ids are hexadecimal. A bonus table id of 0 means no bonus round.
//! Set RUST_LOG=debug for walk details.

use arceus_spawn::app::hunt::HuntFilter;
use arceus_spawn::domain::species::species_by_name;
use arceus_spawn::domain::table_format::TableFormatError;
use arceus_spawn::{
    BatchReport, EncounterRegistry, EventSpec, GroupSeed, HisuiMap, HuntConfig, SpawnBatchSpec,
    SpawnError, Simulator, TableId,
};
use std::env;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[cfg(feature = "mmap")]
use arceus_spawn::infra::table_io::MappedTableFile;

#[cfg(not(feature = "mmap"))]
use arceus_spawn::infra::table_io::load_tables;

const USAGE: &str = "Usage: arceus_predict <event> <args...> [--config <PATH>] [--tables <PATH>]
  static <map> <spawner> <raw-seed>
  distortion <map> <group> <raw-seed>
  outbreak <species> <count> <raw-seed>
  mmo <map> <table-id> <bonus-table-id> <count> <bonus-count> <raw-seed>";

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn format_table_error(path: &Path, err: TableFormatError) -> String {
    match err {
        TableFormatError::InvalidMagic => format!(
            "Invalid file: '{}' is not an encounter table file.",
            path.display()
        ),
        TableFormatError::UnsupportedVersion(version) => format!(
            "Unsupported format version: {}.\nPlease regenerate the table file.",
            version
        ),
        other => format!("{}: {}", path.display(), other),
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> T {
    value
        .parse()
        .unwrap_or_else(|_| fail(format!("invalid {} '{}'", what, value)))
}

fn parse_table_id(value: &str) -> TableId {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16)
        .map(TableId)
        .unwrap_or_else(|_| fail(format!("invalid table id '{}'", value)))
}

fn parse_map(value: &str) -> HisuiMap {
    value.parse().unwrap_or_else(|e: SpawnError| fail(e))
}

fn parse_seed(value: &str) -> GroupSeed {
    value.parse().unwrap_or_else(|e: SpawnError| fail(e))
}

fn load_registry(path: &Path) -> EncounterRegistry {
    let mut registry = EncounterRegistry::with_builtin();
    let start = Instant::now();

    #[cfg(feature = "mmap")]
    let tables = MappedTableFile::open(path).and_then(|file| file.tables());

    #[cfg(not(feature = "mmap"))]
    let tables = load_tables(path);

    let tables = tables.unwrap_or_else(|e| fail(format_table_error(path, e)));
    let count = tables.len();
    registry.extend(tables);

    println!(
        "Loaded {} encounter tables from {} in {:.3} seconds",
        count,
        path.display(),
        start.elapsed().as_secs_f64()
    );
    registry
}

fn build_spec(args: &[String], config: &HuntConfig) -> (SpawnBatchSpec, HuntFilter) {
    let need = |n: usize| {
        if args.len() != n + 1 {
            fail(format!("'{}' takes {} arguments\n{}", args[0], n, USAGE));
        }
    };
    let filter_or_exit = |filter: Result<HuntFilter, _>| {
        filter.unwrap_or_else(|e: arceus_spawn::config::ConfigError| fail(e))
    };

    match args[0].as_str() {
        "static" => {
            need(3);
            let settings = &config.static_alpha;
            let event = EventSpec::StaticAlpha {
                map: parse_map(&args[1]),
                spawner_id: parse_number(&args[2], "spawner id"),
                initial_spawn: settings.initial_spawn,
                static_alpha: settings.static_alpha,
                max_advances: settings.max_advances,
            };
            (
                SpawnBatchSpec::new(event, parse_seed(&args[3]), settings.shiny_rolls),
                filter_or_exit(config.static_alpha_filter()),
            )
        }
        "distortion" => {
            need(3);
            let event = EventSpec::Distortion {
                map: parse_map(&args[1]),
                group_id: parse_number(&args[2], "group id"),
            };
            (
                SpawnBatchSpec::new(event, parse_seed(&args[3]), config.distortion.shiny_rolls),
                filter_or_exit(config.distortion_filter()),
            )
        }
        "outbreak" => {
            need(3);
            let species = match args[1].parse::<u16>() {
                Ok(id) => id,
                Err(_) => species_by_name(&args[1])
                    .map(|s| s.id)
                    .unwrap_or_else(|| fail(format!("unknown species '{}'", args[1]))),
            };
            let event = EventSpec::Outbreak {
                species,
                total: parse_number(&args[2], "spawn count"),
            };
            (
                SpawnBatchSpec::new(event, parse_seed(&args[3]), config.outbreak.outbreak_rolls),
                filter_or_exit(config.outbreak_filter()),
            )
        }
        "mmo" => {
            need(6);
            let bonus_table = parse_table_id(&args[3]);
            let event = EventSpec::MassiveOutbreak {
                map: parse_map(&args[1]),
                group_id: 0,
                table: parse_table_id(&args[2]),
                bonus_table: (bonus_table.0 != 0).then_some(bonus_table),
                total: parse_number(&args[4], "spawn count"),
                bonus_total: parse_number(&args[5], "bonus count"),
            };
            (
                SpawnBatchSpec::new(event, parse_seed(&args[6]), config.outbreak.massive_rolls),
                filter_or_exit(config.outbreak_filter()),
            )
        }
        other => fail(format!("unknown event '{}'\n{}", other, USAGE)),
    }
}

fn print_report(report: &BatchReport) {
    println!(
        "\n{} | group seed {:016X} (raw {:016X})",
        report.label,
        report.group_seed.value(),
        report.group_seed.raw()
    );

    if let Some(reason) = report.skip {
        println!("  skipped: {}", reason);
        return;
    }

    for spawn in &report.spawns {
        println!(
            "{} {:>3} {:?}/{:?} adv {:>3} | {}",
            if spawn.matched { "*" } else { " " },
            spawn.index,
            spawn.round,
            spawn.phase,
            spawn.advance,
            spawn
        );
    }

    let hits = report.hits().count();
    let shinies = report.shinies().count();
    println!(
        "{} spawns, {} shiny, {} matched",
        report.len(),
        shinies,
        hits
    );
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    let mut positional = Vec::new();
    let mut config_path: Option<PathBuf> = None;
    let mut tables_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "--tables" => {
                let flag = args[i].clone();
                i += 1;
                if i >= args.len() {
                    fail(format!("{} requires a value", flag));
                }
                let value = PathBuf::from(&args[i]);
                if flag == "--config" {
                    config_path = Some(value);
                } else {
                    tables_path = Some(value);
                }
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    if positional.is_empty() {
        fail(USAGE);
    }

    let config = match &config_path {
        Some(path) => HuntConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => HuntConfig::default(),
    };

    let registry = match &tables_path {
        Some(path) => load_registry(path),
        None => EncounterRegistry::with_builtin(),
    };

    let (spec, filter) = build_spec(&positional, &config);
    let spec = spec.with_trainer(config.trainer);

    let simulator = Simulator::new(&registry);
    let start = Instant::now();
    let report = simulator
        .simulate_with(&spec, &filter)
        .unwrap_or_else(|e| fail(e));

    print_report(&report);
    println!("Simulated in {:.3} ms", start.elapsed().as_secs_f64() * 1000.0);
}
