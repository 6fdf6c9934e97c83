//! CLI tool simulating a dummy fleet against the formation show server.
//!
//! Registers a set of drones, parks them on a holding circle and streams
//! jittered telemetry. Optionally takes random drones out of service to
//! exercise availability handling.

use clap::Parser;
use rand::Rng;
use std::time::Duration;
use tokio::time;

use sketch_cli::sim::{circle_positions, FleetClient, SimDrone};
use sketch_core::Vec3;

/// Dummy fleet simulator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Server URL
    #[arg(long, default_value = "http://localhost:3000")]
    url: String,

    /// Number of drones to register
    #[arg(long, default_value_t = 8)]
    drones: usize,

    /// Holding circle radius
    #[arg(long, default_value_t = 0.8)]
    radius: f64,

    /// Holding circle center height
    #[arg(long, default_value_t = 1.3)]
    height: f64,

    /// Duration in seconds
    #[arg(long, default_value_t = 60)]
    duration: u64,

    /// Update rate in Hz
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Per-tick probability that one random drone reports a fault
    #[arg(long, default_value_t = 0.0)]
    fault_chance: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = FleetClient::new(&args.url);

    println!("Connecting to formation show server at {}...", args.url);

    let center = Vec3::new(0.0, 0.0, args.height);
    let positions = circle_positions(args.drones, center, args.radius);

    let mut fleet: Vec<SimDrone> = Vec::with_capacity(args.drones);
    for home in positions {
        match client.register(None).await {
            Ok(drone_id) => {
                println!("  Registered: drone {drone_id}");
                fleet.push(SimDrone::new(drone_id, home));
            }
            Err(e) => eprintln!("  Failed to register: {e}"),
        }
    }

    if fleet.is_empty() {
        anyhow::bail!("No drones registered successfully");
    }

    println!("\nStarting fleet simulation");
    println!("  Drones: {}", fleet.len());
    println!("  Duration: {}s, Update rate: {}Hz\n", args.duration, args.rate);

    let mut rng = rand::rng();
    let start = time::Instant::now();
    let mut update_count = 0u32;
    let mut interval = time::interval(Duration::from_secs_f64(1.0 / args.rate));

    loop {
        interval.tick().await;

        if start.elapsed().as_secs() > args.duration {
            break;
        }
        update_count += 1;

        for drone in &mut fleet {
            let telemetry = drone.tick(&mut rng);
            match client.send_telemetry(&telemetry).await {
                Ok(()) => println!(
                    "[{:3}] drone {}: ({:.3}, {:.3}, {:.3}) battery {:.1}%",
                    update_count,
                    telemetry.drone_id,
                    telemetry.position.x,
                    telemetry.position.y,
                    telemetry.position.z,
                    telemetry.battery_pct,
                ),
                Err(e) => eprintln!("[{}] Error: {}", telemetry.drone_id, e),
            }
        }

        // Occasionally ground a random drone
        if args.fault_chance > 0.0 && rng.random_range(0.0..1.0) < args.fault_chance {
            let victim = fleet[rng.random_range(0..fleet.len())].drone_id;
            match client.report_fault(victim).await {
                Ok(()) => println!("  [FAULT] drone {victim} taken out of service"),
                Err(e) => eprintln!("  [FAULT] report failed: {e}"),
            }
        }
    }

    let total_updates = update_count as usize * fleet.len();
    println!("\nSimulation complete. Sent {} total updates.", total_updates);
    Ok(())
}
