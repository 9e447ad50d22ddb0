use clap::{Arg, ArgAction, ArgMatches, Command};
use join_enumerator::logging::{init_logging, parse_level};
use join_enumerator::{
    search_space_size, ConfigSource, EnumeratorConfig, JoinEnumerator, JoinGraph, Topology,
};
use std::path::PathBuf;

/// Join enumeration CLI
///
/// Counts cross-product free bushy join trees for a join graph given as a
/// canonical topology, a list of edges or a JSON graph file.

fn main() {
    let matches = create_cli().get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .and_then(|name| parse_level(name))
        .unwrap_or(tracing::Level::WARN);
    init_logging(level, matches.get_flag("json-logs"));

    if let Err(e) = run_command(matches) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn topology_arg() -> Arg {
    Arg::new("topology")
        .help("Canonical join graph shape")
        .long("topology")
        .value_parser(["chain", "star", "clique"])
}

fn inputs_arg() -> Arg {
    Arg::new("inputs")
        .help("Number of tables")
        .long("inputs")
        .short('n')
        .value_parser(clap::value_parser!(usize))
}

fn create_cli() -> Command {
    Command::new("join-enum-cli")
        .about("Count cross-product free bushy join orders")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(Arg::new("log-level")
            .help("Log level (trace, debug, info, warn, error)")
            .long("log-level")
            .global(true)
            .default_value("warn"))
        .arg(Arg::new("json-logs")
            .help("Emit logs as JSON")
            .long("json-logs")
            .global(true)
            .action(ArgAction::SetTrue))
        .subcommand(
            Command::new("count")
                .about("Enumerate every join tree and count the cross-product free ones")
                .arg(topology_arg().requires("inputs"))
                .arg(inputs_arg())
                .arg(Arg::new("edge")
                    .help("Join condition written as left:right (repeatable)")
                    .long("edge")
                    .short('e')
                    .action(ArgAction::Append))
                .arg(Arg::new("graph")
                    .help("JSON join graph file")
                    .long("graph")
                    .value_parser(clap::value_parser!(PathBuf)))
                .arg(Arg::new("threads")
                    .help("Dedicated worker threads (defaults to the global pool)")
                    .long("threads")
                    .value_parser(clap::value_parser!(usize)))
                .arg(Arg::new("config")
                    .help("JSON configuration file")
                    .long("config")
                    .value_parser(clap::value_parser!(PathBuf)))
                .arg(Arg::new("json")
                    .help("Print run statistics as JSON")
                    .long("json")
                    .action(ArgAction::SetTrue))
                .arg(Arg::new("verify")
                    .help("Compare a topology count against its closed form")
                    .long("verify")
                    .requires("topology")
                    .action(ArgAction::SetTrue))
        )
        .subcommand(
            Command::new("formula")
                .about("Print the closed-form count for a topology")
                .arg(topology_arg().required(true))
                .arg(inputs_arg().required(true))
        )
        .subcommand(
            Command::new("templates")
                .about("List the parenthesization templates for N tables")
                .arg(inputs_arg().required(true))
        )
}

fn run_command(matches: ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("count", sub_matches)) => cmd_count(sub_matches),
        Some(("formula", sub_matches)) => cmd_formula(sub_matches),
        Some(("templates", sub_matches)) => cmd_templates(sub_matches),
        _ => Err("Unknown command".into()),
    }
}

fn load_config(matches: &ArgMatches) -> Result<EnumeratorConfig, Box<dyn std::error::Error>> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EnumeratorConfig::load(&ConfigSource::File(path.clone()))?,
        None => EnumeratorConfig::load(&ConfigSource::Environment)?,
    };

    if let Some(&threads) = matches.get_one::<usize>("threads") {
        config.worker_threads = Some(threads);
        config.validate()?;
    }
    Ok(config)
}

fn cmd_count(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(matches)?;

    let topology = matches
        .get_one::<String>("topology")
        .map(|name| name.parse::<Topology>())
        .transpose()?;

    let enumerator = match topology {
        Some(topology) => {
            let inputs = *matches
                .get_one::<usize>("inputs")
                .ok_or("--topology requires --inputs")?;
            topology.build_with_config(inputs, config)?
        }
        None => {
            let mut graph = match matches.get_one::<PathBuf>("graph") {
                Some(path) => JoinGraph::from_file(path)?,
                None => JoinGraph::new(),
            };
            if let Some(edges) = matches.get_many::<String>("edge") {
                for edge in edges {
                    graph.edges.push(JoinGraph::parse_edge(edge)?);
                }
            }
            if graph.edges.is_empty() && graph.tables.is_empty() {
                return Err("Provide --topology, --edge or --graph".into());
            }

            let mut enumerator = JoinEnumerator::with_config(config)?;
            graph.register(&mut enumerator)?;
            enumerator
        }
    };

    let stats = enumerator.count_with_stats()?;

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("Tables:                {}", stats.inputs);
        println!("Leaf orders:           {}", stats.orders);
        println!("Templates:             {}", stats.templates);
        println!("Trees evaluated:       {}", stats.pairs_evaluated);
        println!("Cross-product free:    {}", stats.cross_product_free);
        println!("Elapsed:               {} ms", stats.elapsed_ms);
    }

    if matches.get_flag("verify") {
        if let Some(topology) = topology {
            let expected = topology.expected_count(stats.inputs);
            if expected != stats.cross_product_free {
                return Err(format!(
                    "{} of {} tables: expected {}, counted {}",
                    topology, stats.inputs, expected, stats.cross_product_free
                )
                .into());
            }
            println!("✓ Matches closed form for {} ({})", topology, expected);
        }
    }

    Ok(())
}

fn cmd_formula(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let topology: Topology = matches
        .get_one::<String>("topology")
        .ok_or("Missing --topology")?
        .parse()?;
    let inputs = *matches.get_one::<usize>("inputs").ok_or("Missing --inputs")?;

    println!("Search space:          {}", search_space_size(inputs));
    println!("Cross-product free:    {}", topology.expected_count(inputs));
    Ok(())
}

fn cmd_templates(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = *matches.get_one::<usize>("inputs").ok_or("Missing --inputs")?;

    let templates = join_enumerator::generate_templates(inputs);
    for template in &templates {
        println!("{}", template);
    }
    println!("\nTotal templates: {}", templates.len());
    Ok(())
}
