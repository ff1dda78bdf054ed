use pathbot_kinematics::*;

fn main() {
    let params = RobotParams::default();
    let robot_result = Robot::new(Pose::new(100.0, 100.0, 0.0), params);

    let target = WorldPoint::new(400.0, 350.0);
    let dt = 1.0 / 60.0; // Time step in seconds
    let num_steps = 240;

    match robot_result {
        Ok(mut robot) => {
            let (radius, wheelbase) = robot.wheel_geometry();
            println!("Initializing simulation...");
            println!("  Robot Parameters:");
            println!("    Radius:       {}", radius);
            println!("    Wheelbase:    {}", wheelbase);
            println!("    Max Speed:    {}", params.max_speed);
            println!("    PID Gains:    {:?}", params.pid);
            println!("  Initial Pose:   {}", robot.pose());
            println!("  Target:         {}", target);
            println!("\nSimulating...");

            robot.set_target(target);
            for i in 0..num_steps {
                if let Err(e) = robot.advance(dt, 800.0, 600.0) {
                    eprintln!("Error during simulation step {}: {:?}", i + 1, e);
                    break;
                }
                if (i + 1) % 20 == 0 {
                    println!("Step {:>3}: Pose: {} Wheels: {}", i + 1, robot.pose(), robot.wheel_speeds());
                }
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {:?}", robot.pose());
            println!("Distance to target: {:.3}", robot.position().distance(&target));
        }
        Err(e) => {
            eprintln!("Failed to initialize robot: {:?}", e);
        }
    }
}
