//! Small arithmetic helpers.

/// Add two numbers.
pub fn add(a: i64, b: i64) -> i64 {
    a + b
}

/// Multiply two numbers.
pub fn multiply(a: i64, b: i64) -> i64 {
    a * b
}

/// Whether a number is even.
pub fn is_even(n: i64) -> bool {
    n % 2 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sums() {
        assert_eq!(add(2, 3), 5);
        assert_eq!(add(-2, 2), 0);
        assert_eq!(add(0, 0), 0);
    }

    #[test]
    fn multiply_products() {
        assert_eq!(multiply(2, 3), 6);
        assert_eq!(multiply(-2, 3), -6);
        assert_eq!(multiply(5, 0), 0);
    }

    #[test]
    fn is_even_checks_parity() {
        assert!(is_even(0));
        assert!(is_even(2));
        assert!(is_even(-4));
        assert!(!is_even(1));
        assert!(!is_even(-3));
    }
}
