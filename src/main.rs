use rand::seq::SliceRandom;
use twenty48::engine::Direction;
use twenty48::session::Session;

fn main() {
    let mut rng = rand::thread_rng();
    let mut session = Session::new(&mut rng);
    println!("{}", session.board());
    let mut move_count = 0;
    while !session.is_terminal() {
        let direction = *Direction::ALL
            .choose(&mut rng)
            .expect("ALL is non-empty");
        if session.apply(direction, &mut rng) {
            move_count += 1;
            println!("{}", session.board());
        }
    }
    println!(
        "Moves made: {}, Highest tile: {}",
        move_count,
        session.board().highest_tile()
    );
}
