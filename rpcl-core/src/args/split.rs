//! Splitting of raw command line tokens.

/// One raw argument split on its first `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitArg {
    pub key: String,
    pub value: String,
}

impl SplitArg {
    /// Dot separated path segments of the key
    pub fn path(&self) -> Vec<&str> {
        self.key.split('.').collect()
    }
}

/// Split raw tokens into key/value pairs, preserving order.
///
/// `["a=1", "b=x=y", "c"]` becomes `[("a", "1"), ("b", "x=y"), ("c", "")]`.
pub fn split_raw<S: AsRef<str>>(args: &[S]) -> Vec<SplitArg> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').unwrap_or((arg, ""));
            SplitArg {
                key: key.to_string(),
                value: value.to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(key: &str, value: &str) -> SplitArg {
        SplitArg {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn splits_on_first_equals_only() {
        let split = split_raw(&["arg1=1", "arg2=a=b", "arg3", "arg4="]);
        assert_eq!(
            split,
            vec![pair("arg1", "1"), pair("arg2", "a=b"), pair("arg3", ""), pair("arg4", "")]
        );
    }

    #[test]
    fn keeps_values_untrimmed() {
        let split = split_raw(&["str=  padded "]);
        assert_eq!(split[0].value, "  padded ");
    }

    #[test]
    fn path_splits_on_dots() {
        assert_eq!(pair("nested.strs.0", "x").path(), vec!["nested", "strs", "0"]);
        assert_eq!(pair("", "x").path(), vec![""]);
    }
}
