//! Example of driving edgesim-core directly from Rust.
//!
//! Usage: EDGESIM_API_ROOT=http://127.0.0.1:5000 cargo run -p edgesim-core --example run_once

use edgesim_core::{
    charts, http, Bound, ClientConfig, CostMetric, ParamForm, ParamSet, RunController, RunState,
    Selection,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Point the client at the algorithm service
    let config = ClientConfig::from_env()?;
    let client = http::connect(&config)?;

    // 2. Start from the catalog defaults and fill in the workload range
    let mut form = ParamForm::full();
    let params = form.mount(&ParamSet::new())?;
    let params = form.edit("Workload (λ)", Bound::Low, "20", &params)?;
    let params = form.edit("Workload (λ)", Bound::High, "100", &params)?;
    let params = form.edit("Network congestion (k)", Bound::Low, "0.02", &params)?;
    let params = form.edit("Network congestion (k)", Bound::High, "0.06", &params)?;

    // 3. Run PPO once
    let mut controller = RunController::new(Selection::Single("PPO".into()));
    controller.set_params(params);
    match controller.run(&client).await {
        RunState::Succeeded { outcome, duration_secs } => {
            println!("{} ({duration_secs:.1}s)", outcome.title());
            if let edgesim_core::RunOutcome::Single { costs, .. } = outcome {
                for metric in CostMetric::ALL {
                    println!("  {:<12} {:?}", metric.display_name(), costs.final_value(metric));
                }
            }
            std::fs::write("ppo.html", charts::to_html(outcome))?;
            println!("Charts written to ppo.html");
        }
        RunState::Failed(e) => eprintln!("{}", e.user_message()),
        _ => {}
    }

    Ok(())
}
