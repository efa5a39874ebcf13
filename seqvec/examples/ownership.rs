use seqvec::SeqVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

#[derive(Default)]
struct Tracked(Option<(usize, Arc<AtomicUsize>)>);

impl Drop for Tracked {
    fn drop(&mut self) {
        if let Some((id, count)) = &self.0 {
            println!("Dropping element {id}");
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn main() {
    println!("--- Ownership Transfer Example ---");
    let drop_count = Arc::new(AtomicUsize::new(0));

    let mut arr = SeqVec::new();
    for i in 0..3 {
        arr.push_back(Tracked(Some((i, drop_count.clone()))));
    }

    let handle = thread::spawn(move || {
        println!("Array moved to worker thread, len {}", arr.len());
        arr.pop_front();
        arr
    });
    let arr = handle.join().expect("worker thread panicked");
    println!("Array back in main thread, len {}", arr.len());

    drop(arr);
    println!("Total elements dropped: {}", drop_count.load(Ordering::SeqCst));
    assert_eq!(drop_count.load(Ordering::SeqCst), 3);
}
