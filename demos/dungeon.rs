//! Print a generated level, then walk it with autoexplore.
//!
//! Run: cargo run --bin dungeon -- [rogue|bsp|city|cave|maze|sewers|random] [seed]

use delve_core::Point;
use delve_rl::{BuilderKind, Dice, FieldOfView, Level};

const SIZE: Point = Point::new(80, 25);
const SIGHT: i32 = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let kind_arg = args.next().unwrap_or_else(|| "random".to_string());
    let mut rng = match args.next() {
        Some(seed) => Dice::new(seed.parse()?),
        None => Dice::from_time(),
    };

    let kind = match kind_arg.as_str() {
        "random" => BuilderKind::random(&mut rng),
        name => BuilderKind::from_name(name).ok_or_else(|| format!("unknown builder: {name}"))?,
    };
    let result = kind.build(&mut rng, SIZE)?;
    println!("{kind} level, seed {}", rng.seed());
    print!("{}", result.render());
    println!("start {}  exit {}", result.start_pos, result.exit_pos);

    let mut level = Level::new(result);
    let mut fov = FieldOfView::new(SIGHT);
    let mut pos = level.result().start_pos;
    let mut steps = 0;
    level.update_vision(&mut fov, pos);
    while let Some(path) = level.autoexplore(pos) {
        for step in path {
            pos = step;
            steps += 1;
            level.update_vision(&mut fov, pos);
        }
    }
    println!();
    print!("{}", level.render_view(&fov));
    println!(
        "explored {} cells in {steps} steps, stopped at {pos}",
        level.explored().count()
    );
    Ok(())
}
