use clap::{value_t, value_t_or_exit, App, Arg};
use log::{Level, LevelFilter, Metadata, Record};
use wfarg::{SimulationFlags, SimulationParams};

struct MinimalLogger;

impl log::Log for MinimalLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        if record.level() > Level::Error {
            println!("{:<5} {}", record.level(), record.args())
        } else {
            eprintln!("{:<5} {}", record.level(), record.args())
        }
    }

    fn flush(&self) {}
}

static MINIMAL_LOGGER: MinimalLogger = MinimalLogger;

fn main() {
    let matches = App::new("neutral_wf")
        .arg(
            Arg::with_name("popsize")
                .short("N")
                .long("popsize")
                .help("Diploid population size")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("theta")
                .short("t")
                .long("theta")
                .help("Scaled mutation rate, 4Nu")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("rho")
                .short("r")
                .long("rho")
                .help("Scaled recombination rate, 4Nr. If absent, each meiosis has exactly one crossover.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("nsam")
                .short("n")
                .long("nsam")
                .help("Number of chromosomes to sample. Default is all 2N.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("S")
                .long("seed")
                .help("Random number seed")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("outfile")
                .short("o")
                .long("outfile")
                .help("Name of output file. The format is a tskit \"trees\" file. Requires the tskit feature.")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("audit")
                .short("a")
                .long("audit")
                .help("Audit all nodes and edges at the end of the simulation")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .help("Increase logging verbosity")
                .takes_value(false),
        )
        .get_matches();

    let popsize = value_t_or_exit!(matches.value_of("popsize"), u32);
    let theta = value_t!(matches.value_of("theta"), f64).unwrap_or(0.0);
    let rho = value_t!(matches.value_of("rho"), f64).ok();
    let nsam = value_t!(matches.value_of("nsam"), usize).ok();
    let seed = value_t_or_exit!(matches.value_of("seed"), u64);

    log::set_logger(&MINIMAL_LOGGER).unwrap();
    log::set_max_level(match matches.occurrences_of("verbose") {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });

    let mut params = match SimulationParams::from_scaled(popsize, theta, rho, nsam, seed) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    params.flags |= SimulationFlags::PREALLOCATE;
    if matches.is_present("audit") {
        params.flags |= SimulationFlags::AUDIT;
    }

    let output = match wfarg::neutral_wf(params) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let tables = output.export();
    println!(
        "nodes: {}\nedges: {}\nsamples: {}\nmutation rate: {}",
        tables.nodes.len(),
        tables.edges.len(),
        tables.samples.len(),
        params.mutation_rate
    );

    if let Some(outfile) = matches.value_of("outfile") {
        write_trees(&output, params.nsteps, outfile);
    }
}

#[cfg(feature = "tskit")]
fn write_trees(output: &wfarg::SimulationOutput, nsteps: i64, outfile: &str) {
    let mut tables = wfarg::tskit_export::convert_to_tskit(
        &output.tracker,
        &output.samples,
        wfarg::simple_time_reverser(wfarg::Time::try_from(nsteps).unwrap()),
    )
    .unwrap();
    wfarg::tskit_export::sort_and_simplify(&mut tables, &output.samples).unwrap();
    tables
        .dump(outfile, tskit::TableOutputOptions::default())
        .unwrap();
}

#[cfg(not(feature = "tskit"))]
fn write_trees(_output: &wfarg::SimulationOutput, _nsteps: i64, _outfile: &str) {
    eprintln!("writing trees requires the tskit feature");
    std::process::exit(1);
}
