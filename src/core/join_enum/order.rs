use super::registry::TableId;
use smallvec::SmallVec;

/// Left-to-right assignment of tables to template slots.
pub type Order = SmallVec<[TableId; 8]>;

/// All `inputs!` permutations of `0..inputs`, in lexicographic order.
pub fn generate_orders(inputs: usize) -> Vec<Order> {
    let mut orders = Vec::new();
    let mut current = Order::with_capacity(inputs);
    let mut used = vec![false; inputs];
    permute(&mut current, &mut used, &mut orders);
    orders
}

fn permute(current: &mut Order, used: &mut [bool], orders: &mut Vec<Order>) {
    if current.len() == used.len() {
        orders.push(current.clone());
        return;
    }

    for table in 0..used.len() {
        if used[table] {
            continue;
        }
        used[table] = true;
        current.push(table);
        permute(current, used, orders);
        current.pop();
        used[table] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::join_enum::math::factorial;
    use std::collections::HashSet;

    #[test]
    fn test_three_inputs_lexicographic() {
        let orders: Vec<Vec<usize>> = generate_orders(3).into_iter().map(|o| o.to_vec()).collect();
        assert_eq!(
            orders,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
    }

    #[test]
    fn test_orders_are_distinct_permutations() {
        for n in 1..=7 {
            let orders = generate_orders(n);
            assert_eq!(orders.len() as u64, factorial(n as u64));

            let distinct: HashSet<&[usize]> = orders.iter().map(|o| o.as_slice()).collect();
            assert_eq!(distinct.len(), orders.len());

            for order in &orders {
                let mut sorted = order.to_vec();
                sorted.sort_unstable();
                assert_eq!(sorted, (0..n).collect::<Vec<_>>());
            }
        }
    }
}
