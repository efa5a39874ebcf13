use seqvec::{ContainerError, SeqVec};

fn main() {
    println!("--- Position Invalidation Example ---");
    let mut arr: SeqVec<u32> = (1..=4).collect();
    let second = arr.begin() + 1;
    println!("len {}, cap {}, second = {:?}", arr.len(), arr.capacity(), arr.get_at(second));

    // Fills the last spare slot, then forces a reallocation.
    arr.push_back(5);
    println!("len {}, cap {}", arr.len(), arr.capacity());

    match arr.get_at(second) {
        Err(ContainerError::StalePosition) => println!("old position rejected after growth"),
        other => println!("unexpected: {:?}", other),
    }

    let fresh = arr.begin() + 1;
    println!("fresh position reads {:?}", arr.get_at(fresh));

    match arr.at(10) {
        Ok(v) => println!("at(10) = {v}"),
        Err(e) => println!("at(10) failed: {e}"),
    }
}
