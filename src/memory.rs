/// Smallest capacity a growable store allocates on its first write.
pub const MIN_CAPACITY: usize = 8;

/// Next capacity for a store that is full at `capacity`.
///
/// Stores start empty, jump to [`MIN_CAPACITY`] on first growth, and double
/// after that, which keeps appends amortized O(1).
pub fn grow_capacity(capacity: usize) -> usize {
    if capacity < MIN_CAPACITY {
        MIN_CAPACITY
    } else {
        capacity * 2
    }
}
