use stickslip::{Params, Sim, SlipState};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("Stick-Slip - Dry Friction Between Two Stops");
    println!("===========================================\n");

    let params = Params::default();
    println!("Scenario:");
    println!("  mass:        {} kg", params.mass);
    println!("  friction:    mu_s = {}, mu_k = {}", params.mu_static, params.mu_kinetic);
    println!("  restitution: {}", params.restitution);
    println!(
        "  stops:       [{}, {}] m",
        params.left_stop, params.right_stop
    );
    println!("  forcing:     ramped sine, reversing at t = 25 s\n");

    let sim = Sim::new(params)?;
    let horizon = 50.0;
    println!("Simulating for {} seconds...\n", horizon);

    let trajectory = sim.run(horizon)?;

    println!("Results:");
    println!("  samples: {}", trajectory.len());
    println!("  events:  {}", trajectory.events().len());
    println!();

    println!("Mode transitions:");
    println!("  {:>10}  {:<18}  {:<12}  {}", "t [s]", "guard", "from", "to");
    for event in trajectory.events() {
        println!(
            "  {:>10.4}  {:<18}  {:<12}  {}",
            event.t,
            event.guard.to_string(),
            event.from.to_string(),
            event.to
        );
    }
    println!();

    if let Some(last) = trajectory.last() {
        println!("Final state at t = {:.2} s:", last.t);
        println!("  mode:     {}", last.state);
        println!("  velocity: {:.6} m/s", last.velocity);
        println!("  position: {:.6} m", last.position);

        let pinned = matches!(
            last.state,
            SlipState::AtLeftStop | SlipState::AtRest | SlipState::AtRightStop
        );
        if pinned {
            println!("  (mass is pinned by static friction)");
        }
    }
    println!();

    let filename = "stickslip.csv";
    trajectory.save(filename)?;
    println!("Trajectory written to {}", filename);

    Ok(())
}
