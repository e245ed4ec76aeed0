/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Return `$error` if `$left` not equals `$right`
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}

/// `rayon::join` over two expressions, a plain tuple without the feature.
#[cfg(feature = "parallel")]
#[macro_export]
macro_rules! join {
    ($a: expr, $b: expr) => {
        rayon::join(|| $a, || $b)
    };
}

/// `rayon::join` over two expressions, a plain tuple without the feature.
#[cfg(not(feature = "parallel"))]
#[macro_export]
macro_rules! join {
    ($a: expr, $b: expr) => {
        ($a, $b)
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn concat_and_join() {
        let v = concat_slices!(b"ab", [1u8, 2], b"c");
        assert_eq!(v, vec![b'a', b'b', 1, 2, b'c']);
        let (a, b) = join!(1 + 1, 2 + 2);
        assert_eq!((a, b), (2, 4));
    }

    #[test]
    fn expect_equality_returns_error() {
        #[derive(Debug, PartialEq)]
        enum Err_ {
            Unequal(usize, usize),
        }
        fn check(n: usize) -> Result<(), Err_> {
            expect_equality!(n, 3, Err_::Unequal);
            Ok(())
        }
        assert!(check(3).is_ok());
        assert_eq!(check(2), Err(Err_::Unequal(2, 3)));
    }
}
