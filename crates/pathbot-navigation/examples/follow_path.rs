use pathbot_kinematics::{Pose, Robot, RobotParams};
use pathbot_navigation::{Obstacle, WaypointQueue, WorldPoint, plan_path, simplify};

fn main() {
    let (width, height) = (800.0, 600.0);
    let obstacles = [Obstacle::new(500.0, 200.0, 50.0, 200.0)];
    let dt = 1.0 / 60.0;
    let tolerance = 15.0;

    let mut robot = match Robot::new(Pose::new(400.0, 300.0, 0.0), RobotParams::default()) {
        Ok(robot) => robot,
        Err(e) => {
            eprintln!("Failed to create robot: {}", e);
            return;
        }
    };

    let goal = WorldPoint::new(700.0, 300.0);
    let raw = plan_path(robot.position(), goal, width, height, &obstacles, 10.0);
    let mut queue = WaypointQueue::new();
    queue.replace(simplify(&raw, 10.0));
    println!("Following {} waypoints from {} to {}", queue.len(), robot.pose(), goal);

    let mut tick = 0;
    while let Some(head) = queue.head() {
        if tick >= 3000 {
            println!("Gave up after {} ticks", tick);
            break;
        }
        robot.set_target(head);
        if let Err(e) = robot.advance(dt, width, height) {
            eprintln!("Tick {} failed: {}", tick, e);
            break;
        }
        if let Some(reached) = queue.advance_if_reached(robot.position(), tolerance) {
            println!("Tick {:>4}: reached {} ({} left)", tick, reached, queue.len());
        }
        tick += 1;
    }

    println!("Final pose: {}, error to goal {:.2}", robot.pose(), robot.position().distance(&goal));
}
