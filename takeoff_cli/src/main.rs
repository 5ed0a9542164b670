//! # Blocktally CLI
//!
//! Command-line runner for the masonry takeoff engine. Loads a `.qto`
//! project and a price-book JSON, recomputes the bill of quantities, and
//! prints a summary table plus the full JSON record.
//!
//! ## Usage
//!
//! ```text
//! takeoff_cli                         # run the built-in demo takeoff
//! takeoff_cli project.qto prices.json # recompute a saved project
//! ```

use std::path::Path;
use std::process::ExitCode;

use takeoff_core::catalog::PriceBook;
use takeoff_core::file_io::load_project;
use takeoff_core::materials::RebarSize;
use takeoff_core::project::Project;
use takeoff_core::walls::{WallDimensions, WallKind};

fn demo_project() -> Project {
    let mut project = Project::new("Demo Surveyor", "25-001", "Demo Client");
    project.dimensions = WallDimensions {
        external_perimeter_m: 20.0,
        internal_perimeter_m: 10.0,
        external_height_m: 2.4,
        internal_height_m: 2.4,
        length_m: 6.0,
        width_m: 4.0,
    };
    project.settings.includes_lintels = true;
    project.settings.includes_dpc = true;
    project.settings.includes_hoop_iron = true;

    let external = project.add_section(WallKind::External);
    project.add_door(external);
    project.add_window(external);
    let _internal = project.add_section(WallKind::Internal);
    project
}

fn demo_price_book() -> PriceBook {
    let mut book = PriceBook::new();
    book.add_material("Cement", 850.0)
        .add_material("Sand", 1800.0)
        .add_material("Ballast", 1500.0)
        .add_material("Water", 200.0)
        .add_variant("Bricks", "Standard Block", 55.0)
        .add_size_price("Doors", "Steel", "0.9 × 2.1 m", 7000.0)
        .add_size_price("Door Frames", "Wood", "0.9 × 2.1 m", 2500.0)
        .add_size_price("Windows", "Clear", "1.2 × 1.2 m", 4200.0)
        .add_size_price("Window Frames", "Wood", "1.2 × 1.2 m", 1800.0)
        .add_variant("Glazing", "Clear", 900.0)
        .add_variant("Sealant", "Glazing Putty", 40.0)
        .add_size_price("Sealant", "Polyurethane", "600 ml sausage", 950.0)
        .add_variant("Hoop Iron", "20kg", 1600.0)
        .add_fastener("Hinges", "butt-hinge", "100mm", 120.0)
        .add_fastener("Locks", "mortice-lock", "3-lever", 950.0)
        .add_fastener("Handles", "lever-handle", "standard", 450.0)
        .add_fastener("Architraves", "timber-architrave", "40x20mm", 300.0)
        .add_fastener("Quarter_Rounds", "timber-quarter-round", "20mm", 150.0)
        .add_dpc("Polyethylene", 95.0)
        .add_rebar(RebarSize::Y8, 150.0)
        .add_rebar(RebarSize::Y10, 145.0)
        .add_rebar(RebarSize::Y12, 140.0);
    book
}

fn load_price_book(path: &Path) -> Result<PriceBook, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    serde_json::from_str(&contents).map_err(|e| format!("bad price book {}: {e}", path.display()))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    let (mut project, book) = match args.len() {
        1 => {
            println!("Blocktally CLI - Masonry Quantity Takeoff");
            println!("=========================================");
            println!();
            println!("No project given; running the built-in demo takeoff...");
            println!();
            (demo_project(), demo_price_book())
        }
        3 => {
            let project = match load_project(Path::new(&args[1])) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error loading project: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let book = match load_price_book(Path::new(&args[2])) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("Error loading price book: {e}");
                    return ExitCode::FAILURE;
                }
            };
            (project, book)
        }
        _ => {
            eprintln!("Usage: takeoff_cli [project.qto prices.json]");
            return ExitCode::FAILURE;
        }
    };

    if !project.recompute(&book) {
        eprintln!("Wall dimensions failed validation; nothing to compute.");
        return ExitCode::FAILURE;
    }
    let totals = project.totals.as_ref().unwrap();

    println!("═══════════════════════════════════════════════════════");
    println!("  BILL OF QUANTITIES  ({})", project.meta.job_id);
    println!("═══════════════════════════════════════════════════════");
    println!();
    println!(
        "Wall area:   {:.2} m² gross, {:.2} m² net",
        totals.gross_area_m2, totals.net_area_m2
    );
    println!(
        "Blocks:      {} net → {} gross",
        totals.net_blocks, totals.gross_blocks
    );
    println!();
    println!(
        "{:<24} {:>10} {:>10} {:>12} {:>12}  {}",
        "item", "net qty", "gross qty", "net cost", "gross cost", "unit"
    );
    println!("{}", "-".repeat(78));
    for item in &totals.line_items {
        println!(
            "{:<24} {:>10.2} {:>10.2} {:>12.2} {:>12.2}  {}",
            item.item_type,
            item.net_quantity,
            item.gross_quantity,
            item.net_cost,
            item.gross_cost,
            item.unit
        );
    }
    println!("{}", "-".repeat(78));
    println!(
        "Professional elements: {:.2} (flat) / {:.2} (with wastage)",
        totals.professional_elements_total_cost, totals.professional_elements_gross_cost
    );
    if let Some(hoop) = &totals.hoop_iron {
        println!(
            "Hoop iron: {} courses, {:.1} m, {} rolls at {:.2}",
            hoop.courses, hoop.length_m, hoop.coils, hoop.price_per_roll
        );
    }
    println!();
    println!(
        "TOTAL: {:.2} net → {:.2} gross",
        totals.net_total_cost, totals.gross_total_cost
    );
    println!();

    println!("JSON Output (for export/API use):");
    match serde_json::to_string_pretty(totals) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing totals: {e}"),
    }

    ExitCode::SUCCESS
}
