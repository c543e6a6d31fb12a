/**
 * Asteroid X-ray Energy Deposition Code
 */




// ============================================================================
mod app;
mod curves;
mod deposition;
mod geometry;
mod integrator;
mod materials;
mod patch;
mod quadrature;




// ============================================================================
use app::Configuration;
use integrator::DepositionIntegrator;




// ============================================================================
fn main() -> anyhow::Result<()> {

    let input = match std::env::args().skip(1).next() {
        None => anyhow::bail!("no input file given"),
        Some(input) => input,
    };

    println!();
    println!("\t{}", app::DESCRIPTION);
    println!("\t{}", app::VERSION_AND_BUILD);
    println!();
    println!("\tinput file ................. {}", input);

    let mut config = Configuration::from_preset_or_file(&input)?;
    config.patch_from_args()?;
    config.validate()?;

    println!("\tmaterial ................... {}", config.model.material);
    println!("\tsource temperature ......... {}", config.model.source_temperature);
    println!("\tyield ...................... {} kt", config.source.yield_kt);
    println!("\theight of burst ............ {} m", config.source.height_of_burst_m);
    println!("\ttarget radius .............. {} m", config.target.radius_m);
    println!("\tporosity ................... {}", config.target.porosity);
    println!();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.numerics.num_threads)
        .build()?;

    let integrator = DepositionIntegrator::new(
        config.energy_model(),
        config.irradiation(),
        config.tolerances());
    let report = integrator.total_deposition(&runtime)?;

    println!();
    println!("\tenergy intercepted ......... {:.6} kt", report.intercepted_kt);
    println!("\tintegrated deposition ...... {:.6} kt +- {:.6e} kt", report.integrated_kt, report.integration_error_kt);
    println!("\tzone-summed deposition ..... {:.6} kt", report.zone_summed_kt);

    if !report.quadrature_converged() {
        println!("\twarning: quadrature error estimate exceeds 1% of the integral");
    }
    println!();
    print!("{}", serde_yaml::to_string(&report)?);

    Ok(())
}
