// ========================================================================================
//
//                        THE STRATEGIC ORCHESTRATOR: CATCHMENT
//
// ========================================================================================
//
// This binary is the conductor of the application. Its sole responsibility is to
// sequence the phases defined in the library modules (parse & prepare, select,
// emit) and to own the application lifecycle from argument parsing to the final
// output file.
//
// ### The Orchestration Mandate ###
//
// 1.  **All-or-nothing output.** Either the run completes and the full ranked
//     result is written, or it aborts with a descriptive cause and no output
//     file at all. The output file is not even created until selection has
//     finished, so a fatal abort can never leave a partial artifact behind.
//
// 2.  **Intelligent path resolution.** The output path defaults to the
//     prediction file's name with `.picks` appended, placed alongside it, and
//     handles non-UTF8 paths by operating on `OsString`.
//
// 3.  **Resource ownership.** `main` owns the prepared network and the selection
//     result; the library modules only ever borrow them.

use catchment::prepare;
use catchment::select::select_top_k;
use catchment::types::Pick;
use catchment::weight::WeightPolicy;
use clap::Parser;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

// ========================================================================================
//                         COMMAND-LINE INTERFACE DEFINITION
// ========================================================================================

#[derive(Parser, Debug)]
#[clap(
    name = "catchment",
    version,
    about = "Ranks census tracts for intervention by lazy-greedy maximum coverage."
)]
struct Args {
    /// Path to the adjacency JSON mapping each tract id to the tract ids it covers.
    adjacency: PathBuf,

    /// Path to the feature CSV
    /// (geo_id,total_population,median_income,households,labor_force,baseline_pct).
    features: PathBuf,

    /// Path to the prediction CSV (geo_id,predicted_pct).
    predictions: PathBuf,

    /// Number of tracts to select.
    #[clap(long, default_value_t = 25)]
    count: usize,

    /// Benefit accounting policy.
    #[clap(long, value_enum, default_value_t = WeightPolicy::PerTract)]
    policy: WeightPolicy,

    /// Output path; defaults to the prediction file's name with `.picks` appended.
    #[clap(long)]
    out: Option<PathBuf>,
}

// ========================================================================================
//                           THE MAIN ORCHESTRATION LOGIC
// ========================================================================================

fn main() {
    env_logger::init();
    let start_time = Instant::now();
    let args = Args::parse();

    // --- Phase 1: Output Path Resolution ---
    // Resolved before any heavy work so that an unusable destination fails fast.
    let out_path = match resolve_output_path(&args) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error resolving output path: {}", e);
            process::exit(1);
        }
    };

    // --- Phase 2: The Preparation Phase ---
    eprintln!(
        "> Preparing coverage network from {}",
        args.adjacency.display()
    );
    let prep_result = match prepare::prepare_network(
        &args.adjacency,
        &args.features,
        &args.predictions,
        args.policy,
    ) {
        Ok(res) => res,
        Err(e) => {
            eprintln!("Fatal error during preparation: {}", e);
            process::exit(1);
        }
    };
    eprintln!(
        "> Preparation complete. {} tracts in the network, {} weighted ({} defaulted).",
        prep_result.num_tracts, prep_result.num_weighted, prep_result.num_defaulted
    );

    // --- Phase 3: Lazy Greedy Selection ---
    eprintln!("> Selecting up to {} tracts...", args.count);
    let mut network = prep_result.network;
    let picks = select_top_k(&mut network, args.count);
    if picks.len() < args.count {
        eprintln!(
            "> Only {} tracts retain extractable positive value; reporting a short list.",
            picks.len()
        );
    }

    // --- Phase 4: Finalization and Output ---
    eprintln!("> Writing {} picks to {}", picks.len(), out_path.display());
    if let Err(e) = write_picks(&out_path, &picks) {
        eprintln!("Error writing output file: {}", e);
        process::exit(1);
    }

    eprintln!(
        "\nSuccess! Total execution time: {:.2?}",
        start_time.elapsed()
    );
}

// ========================================================================================
//                                  HELPER FUNCTIONS
// ========================================================================================

/// Resolves the destination of the ranked result. The explicit `--out` wins;
/// otherwise the prediction file's name grows a `.picks` suffix in place.
fn resolve_output_path(args: &Args) -> Result<PathBuf, String> {
    if let Some(path) = &args.out {
        return Ok(path.clone());
    }
    match args.predictions.file_name() {
        Some(name) => {
            let mut os_string = OsString::from(name);
            os_string.push(".picks");
            Ok(args.predictions.with_file_name(os_string))
        }
        None => Err(format!(
            "could not determine a base name from prediction file path '{}'",
            args.predictions.display()
        )),
    }
}

/// Writes the ranked result, one `"<id>: <value>"` line per pick in selection
/// order. Floats are rendered with `ryu` into a reusable buffer.
fn write_picks(path: &Path, picks: &[Pick]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let mut value_buffer = ryu::Buffer::new();

    for pick in picks {
        writeln!(writer, "{}: {}", pick.geo_id, value_buffer.format(pick.value))?;
    }
    writer.flush()
}
