//! 核心宏定义
//!
//! 为配置结构体提供默认值宏，减少样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```ignore
/// struct PendingConfig {
///     capacity: usize,
///     label: String,
/// }
///
/// impl_default!(PendingConfig {
///     capacity: 64,
///     label: String::new(),
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

/// 同时实现Default和new()的宏
#[macro_export]
macro_rules! impl_default_and_new {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }

        impl $struct_name {
            pub fn new() -> Self {
                Self::default()
            }
        }
    };
}

#[cfg(test)]
mod tests {

    struct Slot {
        capacity: usize,
        label: String,
    }

    impl_default_and_new!(Slot {
        capacity: 8,
        label: "bridge".to_string(),
    });

    #[test]
    fn test_impl_default_and_new() {
        let s1 = Slot::default();
        let s2 = Slot::new();

        assert_eq!(s1.capacity, 8);
        assert_eq!(s1.label, "bridge");
        assert_eq!(s2.capacity, s1.capacity);
        assert_eq!(s2.label, s1.label);
    }
}
