use seqvec::{SeqVec, seqvec};

fn main() {
    println!("--- Basic Usage Example ---");
    let mut arr = SeqVec::new();

    for i in 1..=5 {
        arr.push_back(i * 10);
        println!("Pushed: {}, len: {}, cap: {}", i * 10, arr.len(), arr.capacity());
    }

    arr.push_front(0);
    println!("After push_front: {:?}", arr);

    let at = arr.begin() + 3;
    arr.insert(at, 25).expect("position issued by this buffer");
    println!("After insert at 3: {:?}", arr);

    let tail = arr
        .slice(arr.begin() + 2, arr.end())
        .expect("range inside the sequence");
    println!("Slice [2, end): {:?}", tail);

    arr.reverse();
    println!("Reversed: {:?}", arr);

    while let Some(val) = arr.pop_back() {
        println!("Popped: {}, len: {}", val, arr.len());
    }

    println!("Capacity kept after draining: {}", arr.capacity());
    assert_eq!(seqvec![1, 2, 3], [1, 2, 3]);
}
