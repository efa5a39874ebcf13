use super::*;
use crossbeam::scope;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_round_up_capacity() {
    assert_eq!(round_up_capacity(0), 2);
    assert_eq!(round_up_capacity(1), 2);
    assert_eq!(round_up_capacity(2), 2);
    assert_eq!(round_up_capacity(3), 4);
    assert_eq!(round_up_capacity(5), 8);
    assert_eq!(round_up_capacity(1024), 1024);
    assert_eq!(round_up_capacity(1025), 2048);
    assert_eq!(
        try_round_up_capacity(usize::MAX),
        Err(ContainerError::CapacityOverflow(usize::MAX))
    );
}

#[test]
fn test_with_len_capacity() {
    for n in 0..70 {
        let v: SeqVec<u32> = SeqVec::with_len(n);
        assert_eq!(v.len(), n);
        assert_eq!(v.capacity(), round_up_capacity(n));
        assert!(v.iter().all(|&x| x == 0));
    }
}

#[test]
fn test_empty() {
    let v: SeqVec<i32> = SeqVec::new();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 2);
    assert_eq!(v.front(), None);
    assert_eq!(v.back(), None);
    assert_eq!(v.begin(), v.end());
}

#[test]
fn test_negative_length() {
    assert_eq!(
        SeqVec::<i32>::try_with_len(-1).unwrap_err(),
        ContainerError::InvalidLength(-1)
    );
    let v = SeqVec::<i32>::try_with_len(5).unwrap();
    assert_eq!(v.len(), 5);
    assert_eq!(v.capacity(), 8);
}

#[test]
#[should_panic(expected = "capacity overflow")]
fn test_capacity_overflow_panics() {
    let _ = SeqVec::<u8>::with_len(usize::MAX);
}

#[test]
fn test_list_growth() {
    let mut v = seqvec![1, 2, 3];
    assert_eq!(v.len(), 3);
    assert_eq!(v.capacity(), 4);
    v.push_back(4);
    assert_eq!(v, [1, 2, 3, 4]);
    assert_eq!(v.capacity(), 4);
    v.push_back(5);
    assert_eq!(v, [1, 2, 3, 4, 5]);
    assert_eq!(v.capacity(), 8);
}

#[test]
fn test_basic_push_pop() {
    let mut v = SeqVec::new();
    v.push_back(1);
    v.push_back(2);
    v.push_back(3);
    assert_eq!(v.len(), 3);
    assert_eq!(v[0], 1);
    assert_eq!(v[2], 3);
    assert_eq!(v.pop_back(), Some(3));
    assert_eq!(v.pop_back(), Some(2));
    assert_eq!(v.pop_back(), Some(1));
    assert_eq!(v.pop_back(), None);
}

#[test]
fn test_pop_back_leaves_default() {
    let mut v = seqvec![7, 8, 9];
    assert_eq!(v.pop_back(), Some(9));
    // Re-expose the vacated slot without reallocating.
    v.resize(3);
    assert_eq!(v, [7, 8, 0]);
}

#[test]
fn test_push_pop_identity() {
    let mut v = seqvec![4, 5, 6, 7];
    let before = v.clone();
    v.push_back(99);
    v.pop_back();
    assert_eq!(v, before);
}

#[test]
fn test_push_front() {
    let mut v = seqvec![1, 2, 3];
    v.push_front(0);
    assert_eq!(v, [0, 1, 2, 3]);
    v.push_front(-1);
    assert_eq!(v, [-1, 0, 1, 2, 3]);
    assert_eq!(v.capacity(), 8);

    let mut empty = SeqVec::new();
    empty.push_front("x");
    assert_eq!(empty, ["x"]);
}

#[test]
fn test_pop_front() {
    let mut v = seqvec![1, 2, 3];
    assert_eq!(v.pop_front(), Some(1));
    assert_eq!(v, [2, 3]);
    assert_eq!(v.pop_front(), Some(2));
    assert_eq!(v.pop_front(), Some(3));
    assert_eq!(v.pop_front(), None);
    assert_eq!(v.capacity(), 4);
}

#[test]
fn test_front_back() {
    let mut v = seqvec![1, 2, 3];
    assert_eq!(v.front(), Some(&1));
    assert_eq!(v.back(), Some(&3));
    *v.front_mut().unwrap() = 10;
    *v.back_mut().unwrap() = 30;
    assert_eq!(v, [10, 2, 30]);
}

#[test]
fn test_checked_access() {
    let mut v = seqvec![1, 2, 3];
    assert_eq!(v.at(2), Ok(&3));
    assert_eq!(v.at(5), Err(ContainerError::OutOfRange { index: 5, len: 3 }));
    *v.at_mut(0).unwrap() = 11;
    assert_eq!(v[0], 11);
    assert!(v.at_mut(3).is_err());
}

#[test]
#[should_panic(expected = "index out of bounds")]
fn test_index_out_of_bounds() {
    let v = seqvec![1, 2, 3];
    let _value = v[3];
}

#[test]
fn test_insert_remove() {
    let mut v = seqvec![1, 2, 3];
    let pos = v.insert(v.begin() + 1, 99).unwrap();
    assert_eq!(v, [1, 99, 2, 3]);
    assert_eq!(v.get_at(pos), Ok(&99));

    let next = v.erase(v.begin()).unwrap();
    assert_eq!(v, [99, 2, 3]);
    assert_eq!(v.get_at(next), Ok(&99));
}

#[test]
fn test_erase_begin() {
    let mut v = seqvec![1, 2, 3];
    v.erase(v.begin()).unwrap();
    assert_eq!(v, [2, 3]);
    assert_eq!(v.len(), 2);
}

#[test]
fn test_insert_every_offset() {
    let base = seqvec![10, 20, 30, 40];
    for k in 0..=base.len() {
        let mut v = base.clone();
        v.insert(v.begin() + k as isize, 7).unwrap();
        assert_eq!(v.len(), base.len() + 1);
        assert_eq!(v[k], 7);
        assert_eq!(&v[..k], &base[..k]);
        assert_eq!(&v[k + 1..], &base[k..]);
    }
}

#[test]
fn test_erase_every_offset() {
    let base = seqvec![10, 20, 30, 40, 50];
    for k in 0..base.len() {
        let mut v = base.clone();
        v.erase(v.begin() + k as isize).unwrap();
        assert_eq!(v.len(), base.len() - 1);
        assert_eq!(&v[..k], &base[..k]);
        assert_eq!(&v[k..], &base[k + 1..]);
    }
}

#[test]
fn test_insert_on_empty_ignores_position() {
    let mut other = seqvec![1];
    let foreign = other.end();
    other.clear();

    let mut v: SeqVec<i32> = SeqVec::new();
    v.insert(foreign, 5).unwrap();
    assert_eq!(v, [5]);
}

#[test]
fn test_erase_on_empty_is_noop() {
    let mut v: SeqVec<i32> = SeqVec::new();
    let begin = v.begin();
    assert_eq!(v.erase(begin).unwrap(), v.begin());
    assert_eq!(v.erase_range(begin, begin + 3).unwrap(), v.begin());
    assert!(v.is_empty());
}

#[test]
fn test_erase_end_rejected() {
    let mut v = seqvec![1, 2];
    assert_eq!(
        v.erase(v.end()),
        Err(ContainerError::InvalidPosition { slot: 2, len: 2 })
    );
}

#[test]
fn test_insert_across_reallocation() {
    let mut v = seqvec![1, 2, 3, 4];
    assert_eq!(v.capacity(), 4);
    let pos = v.insert(v.begin() + 2, 9).unwrap();
    assert_eq!(v.capacity(), 8);
    assert_eq!(v, [1, 2, 9, 3, 4]);
    assert_eq!(v.get_at(pos), Ok(&9));
}

#[test]
fn test_insert_n() {
    let mut v = seqvec![1, 2, 3];
    let pos = v.insert_n(v.begin() + 1, 3, 0).unwrap();
    assert_eq!(v, [1, 0, 0, 0, 2, 3]);
    assert_eq!(pos.slot(), 1);

    let end = v.end();
    v.insert_n(end, 2, 9).unwrap();
    assert_eq!(v, [1, 0, 0, 0, 2, 3, 9, 9]);

    let before = v.clone();
    v.insert_n(v.begin(), 0, 5).unwrap();
    assert_eq!(v, before);
}

#[test]
fn test_insert_slice() {
    let mut v = seqvec![1, 5];
    v.insert_slice(v.begin() + 1, &[2, 3, 4]).unwrap();
    assert_eq!(v, [1, 2, 3, 4, 5]);
    v.insert_slice(v.begin(), &[]).unwrap();
    assert_eq!(v.len(), 5);
}

#[test]
fn test_insert_range() {
    let src = seqvec!['a', 'b', 'c', 'd'];
    let mut v = seqvec!['x', 'y'];
    v.insert_range(v.begin() + 1, &src, src.cbegin() + 1, src.cend() - 1)
        .unwrap();
    assert_eq!(v, ['x', 'b', 'c', 'y']);

    let err = v
        .insert_range(v.begin(), &src, src.cend(), src.cbegin())
        .unwrap_err();
    assert_eq!(err, ContainerError::InvalidRange { first: 4, last: 0 });
    assert_eq!(v.len(), 4);
}

#[test]
fn test_erase_range() {
    let mut v = seqvec![0, 1, 2, 3, 4, 5];
    let next = v.erase_range(v.begin() + 1, v.begin() + 4).unwrap();
    assert_eq!(v, [0, 4, 5]);
    assert_eq!(v.get_at(next), Ok(&4));

    let before = v.clone();
    v.erase_range(v.begin() + 1, v.begin() + 1).unwrap();
    assert_eq!(v, before);

    assert_eq!(
        v.erase_range(v.end(), v.begin()),
        Err(ContainerError::InvalidRange { first: 3, last: 0 })
    );
}

#[test]
fn test_from_range() {
    let src = seqvec![1, 2, 3, 4, 5];
    let v = SeqVec::from_range(&src, src.begin() + 1, src.begin() + 4).unwrap();
    assert_eq!(v, [2, 3, 4]);
    assert_eq!(v.capacity(), 4);

    assert_eq!(
        SeqVec::from_range(&src, src.end(), src.begin()).unwrap_err(),
        ContainerError::InvalidRange { first: 5, last: 0 }
    );
    assert_eq!(
        SeqVec::from_range(&src, src.begin(), src.end() + 1).unwrap_err(),
        ContainerError::InvalidPosition { slot: 6, len: 5 }
    );
}

#[test]
fn test_slice_leaves_source() {
    let src = seqvec![1, 2, 3, 4, 5];
    let part = src.slice(src.begin() + 2, src.end()).unwrap();
    assert_eq!(part, [3, 4, 5]);
    assert_eq!(src, [1, 2, 3, 4, 5]);

    let empty = src.slice(src.begin(), src.begin()).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.capacity(), 2);
}

#[test]
fn test_reverse() {
    let mut v = seqvec![1, 2, 3, 4, 5];
    v.reverse();
    assert_eq!(v, [5, 4, 3, 2, 1]);

    let mut even = seqvec![1, 2, 3, 4];
    even.reverse();
    assert_eq!(even, [4, 3, 2, 1]);

    let mut empty: SeqVec<i32> = SeqVec::new();
    empty.reverse();
    assert!(empty.is_empty());
}

#[test]
fn test_clear_keeps_stale_values() {
    let mut v = seqvec![1, 2, 3];
    v.clear();
    assert!(v.is_empty());
    assert_eq!(v.capacity(), 4);
    v.resize(2);
    assert_eq!(v, [1, 2]);
}

#[test]
fn test_resize_stale_and_default() {
    let mut v = seqvec![1, 2, 3];
    v.resize(1);
    v.resize(3);
    assert_eq!(v, [1, 2, 3]);

    v.resize(1);
    v.resize_default(3);
    assert_eq!(v, [1, 0, 0]);

    // Growing past capacity exposes fresh default slots.
    v.resize(6);
    assert_eq!(v, [1, 0, 0, 0, 0, 0]);
    assert_eq!(v.capacity(), 8);
}

#[test]
fn test_truncate_and_scrub() {
    let mut v = seqvec![1, 2, 3, 4];
    v.truncate(2);
    assert_eq!(v, [1, 2]);
    v.resize(4);
    assert_eq!(v, [1, 2, 0, 0]);

    let mut w = seqvec![5, 6, 7];
    w.clear();
    w.scrub_spare();
    w.resize(3);
    assert_eq!(w, [0, 0, 0]);
}

#[test]
fn test_reserve_and_shrink() {
    let mut v: SeqVec<i32> = SeqVec::new();
    v.reserve(10);
    assert_eq!(v.capacity(), 16);
    assert!(v.is_empty());
    assert!(v.try_reserve(usize::MAX).is_err());

    v.extend(0..5);
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 8);
    v.clear();
    v.shrink_to_fit();
    assert_eq!(v.capacity(), 2);
}

#[test]
fn test_swap() {
    let mut a = seqvec![1, 2, 3];
    let mut b = seqvec![9];
    let pos = a.begin() + 1;
    a.swap(&mut b);
    assert_eq!(a, [9]);
    assert_eq!(b, [1, 2, 3]);
    assert_eq!(b.capacity(), 4);
    // Positions follow the buffer they were issued for.
    assert_eq!(b.get_at(pos), Ok(&2));
    assert_eq!(a.get_at(pos), Err(ContainerError::StalePosition));
}

#[test]
fn test_clone_and_assign() {
    let src = seqvec![1, 2, 3, 4, 5];
    let mut dst = seqvec![9, 9];
    dst.clone_from(&src);
    assert_eq!(dst, src);
    assert_eq!(dst.capacity(), 8);

    dst.assign(&[7]);
    assert_eq!(dst, [7]);
    assert_eq!(dst.capacity(), 8);

    let copy = src.clone();
    assert_eq!(copy.capacity(), src.capacity());
}

#[test]
fn test_move_transfers_ownership() {
    let mut src = seqvec![1, 2, 3];
    let moved = std::mem::take(&mut src);
    assert_eq!(moved, [1, 2, 3]);
    assert!(src.is_empty());
}

#[test]
fn test_equality() {
    let a = seqvec![1, 2, 3];
    let b = seqvec![1, 2, 3];
    let c = seqvec![1, 2, 3, 4];
    let d = seqvec![1, 5, 3];
    assert_eq!(a, a);
    assert_eq!(a, b);
    assert_eq!(b, a);
    assert_ne!(a, c);
    assert_ne!(c, a);
    assert_ne!(a, d);
    assert!(!(a != b));

    // Equality ignores capacity and stale spare slots.
    let mut e = seqvec![1, 2, 3, 4, 5, 6];
    e.resize(3);
    assert_eq!(e, a);
}

#[test]
fn test_position_arithmetic() {
    let v = seqvec![1, 2, 3, 4];
    let begin = v.begin();
    let end = v.end();
    assert_eq!(end - begin, 4);
    assert_eq!(begin - end, -4);

    let mut p = begin + 3;
    assert!(p < end);
    assert!(begin < p);
    p -= 1;
    assert_eq!(v.get_at(p), Ok(&3));
    p += 2;
    assert_eq!(p, end);

    let c: ConstPos = p.into();
    assert_eq!(c, v.cend());
    assert_eq!(v.cbegin(), begin);
}

#[test]
fn test_positions_from_different_buffers_are_unordered() {
    let a = seqvec![1, 2];
    let b = seqvec![1, 2];
    assert_ne!(a.begin(), b.begin());
    assert_eq!(a.begin().partial_cmp(&b.end()), None);
    assert_eq!(a.end().checked_distance(&b.begin()), None);
    assert_eq!(a.end().checked_distance(&a.begin()), Some(2));
    assert_eq!(a.get_at(b.begin()), Err(ContainerError::StalePosition));
}

#[test]
fn test_stale_position_after_reallocation() {
    let mut v = seqvec![1, 2];
    let pos = v.begin();
    v.push_back(3);
    assert_eq!(v.get_at(pos), Err(ContainerError::StalePosition));
    assert_eq!(v.insert(pos, 0), Err(ContainerError::StalePosition));
    assert_eq!(v.get_at(v.begin()), Ok(&1));

    // Growth inside the current capacity keeps positions valid.
    let pos = v.begin() + 2;
    v.push_back(4);
    assert_eq!(v.get_at(pos), Ok(&3));
}

#[test]
fn test_write_through_position() {
    let mut v = seqvec![1, 2, 3];
    let pos = v.begin() + 1;
    *v.get_mut_at(pos).unwrap() = 20;
    assert_eq!(v, [1, 20, 3]);
    assert_eq!(
        v.get_mut_at(v.begin() - 1),
        Err(ContainerError::InvalidPosition { slot: -1, len: 3 })
    );
}

#[test]
fn test_raii_drop() {
    let counter = Arc::new(AtomicUsize::new(0));
    struct Droppable(Arc<AtomicUsize>);
    impl Drop for Droppable {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    {
        let mut v = SeqVec::new();
        for _ in 0..10 {
            v.push_back(Some(Droppable(counter.clone())));
        }
        drop(v.pop_back());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        v.erase(v.begin()).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
    assert_eq!(counter.load(Ordering::SeqCst), 10);
}

#[test]
fn test_default_panic_during_fill() {
    static BUILT: AtomicUsize = AtomicUsize::new(0);
    static DROPPED: AtomicUsize = AtomicUsize::new(0);

    struct Fragile;
    impl Default for Fragile {
        fn default() -> Self {
            if BUILT.fetch_add(1, Ordering::SeqCst) == 5 {
                panic!("sixth default");
            }
            Fragile
        }
    }
    impl Drop for Fragile {
        fn drop(&mut self) {
            DROPPED.fetch_add(1, Ordering::SeqCst);
        }
    }

    let result = std::panic::catch_unwind(|| SeqVec::<Fragile>::with_len(8));
    assert!(result.is_err());
    assert_eq!(DROPPED.load(Ordering::SeqCst), 5);
}

#[test]
fn test_zero_sized() {
    let mut v = SeqVec::new();
    for _ in 0..100 {
        v.push_back(());
    }
    assert_eq!(v.len(), 100);
    assert_eq!(v.capacity(), 128);
    v.erase(v.begin() + 50).unwrap();
    assert_eq!(v.len(), 99);
}

#[test]
fn test_iterators() {
    let mut v = seqvec![10, 20, 30];

    let mut sum = 0;
    for &x in &v {
        sum += x;
    }
    assert_eq!(sum, 60);

    for x in &mut v {
        *x += 1;
    }
    assert_eq!(v[0], 11);

    let collected: Vec<i32> = v.clone().into_iter().collect();
    assert_eq!(collected, vec![11, 21, 31]);

    let reversed: Vec<i32> = v.into_iter().rev().collect();
    assert_eq!(reversed, vec![31, 21, 11]);
}

#[test]
fn test_conversions() {
    let from_vec = SeqVec::from(vec![String::from("a"), String::from("b")]);
    assert_eq!(from_vec.len(), 2);
    assert_eq!(from_vec.capacity(), 2);

    let from_slice = SeqVec::from(&[1u8, 2, 3][..]);
    assert_eq!(from_slice, [1, 2, 3]);

    let collected: SeqVec<usize> = (0..9).collect();
    assert_eq!(collected.capacity(), 16);
    assert_eq!(format!("{:?}", seqvec![1, 2]), "[1, 2]");
    assert_eq!(seqvec![4; 3], [4, 4, 4]);
}

#[test]
fn test_concurrency() {
    let mut v = SeqVec::new();
    for i in 0..100 {
        v.push_back(i);
    }

    scope(|s| {
        s.spawn(|_| v.iter().sum::<i32>());
        s.spawn(|_| v.iter().filter(|x| *x % 2 == 0).count());
    })
    .unwrap();
}

/// Applies random operations to a `SeqVec` and a `Vec` side by side.
#[test]
fn test_against_vec_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut v: SeqVec<i32> = SeqVec::new();
    let mut model: Vec<i32> = Vec::new();

    for _ in 0..2_000 {
        let value = rng.random_range(-1000..1000);
        match rng.random_range(0..8) {
            0 => {
                v.push_back(value);
                model.push(value);
            }
            1 => {
                v.push_front(value);
                model.insert(0, value);
            }
            2 => assert_eq!(v.pop_back(), model.pop()),
            3 => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(v.pop_front(), expected);
            }
            4 => {
                let k = rng.random_range(0..=model.len());
                v.insert(v.begin() + k as isize, value).unwrap();
                if model.is_empty() {
                    model.push(value);
                } else {
                    model.insert(k, value);
                }
            }
            5 if !model.is_empty() => {
                let k = rng.random_range(0..model.len());
                v.erase(v.begin() + k as isize).unwrap();
                model.remove(k);
            }
            6 => {
                let k = rng.random_range(0..=model.len());
                let n = rng.random_range(0..4);
                v.insert_n(v.begin() + k as isize, n, value).unwrap();
                model.splice(k..k, std::iter::repeat_n(value, n));
            }
            _ => {
                let a = rng.random_range(0..=model.len());
                let b = rng.random_range(a..=model.len());
                v.erase_range(v.begin() + a as isize, v.begin() + b as isize)
                    .unwrap();
                model.drain(a..b);
            }
        }
        assert_eq!(v.as_slice(), model.as_slice());
        assert!(v.capacity() >= round_up_capacity(v.len()));
        assert!(v.capacity().is_power_of_two());
    }
}

#[test]
fn test_reverse_is_involution() {
    let mut rng = StdRng::seed_from_u64(42);
    for len in 0..20 {
        let original: SeqVec<u8> = (0..len).map(|_| rng.random()).collect();
        let mut v = original.clone();
        v.reverse();
        v.reverse();
        assert_eq!(v, original);
    }
}
