/// Keep the `n` largest items, largest first.
///
/// The sort is stable, so items with equal sizes keep their input order.
/// `n == 0` yields an empty list; `n` past the end keeps everything.
pub fn top_n<T, F>(mut items: Vec<T>, n: usize, size_of: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    items.sort_by(|a, b| size_of(b).cmp(&size_of(a)));
    items.truncate(n);
    items
}
