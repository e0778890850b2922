//! 以字符串形式存储与传输的枚举
//!
//! 生成 `as_str`、`Display`、`FromStr` 以及带候选值提示的 `Deserialize`。

#[macro_export]
macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident in $label:literal => $export:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, ts_rs::TS)]
        #[ts(export, export_to = $export)]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "无效的{}: '{}'. 支持的值: {}",
                        $label,
                        s,
                        [$($value),+].join(", ")
                    )),
                }
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::define_string_enum! {
        enum Sample in "示例" => "../frontend/src/types/generated/sample.ts" {
            First = "first",
            SecondValue = "second_value",
        }
    }

    #[test]
    fn test_string_enum_round_trip() {
        assert_eq!(Sample::SecondValue.to_string(), "second_value");
        assert_eq!("first".parse::<Sample>().unwrap(), Sample::First);
        assert_eq!(
            serde_json::to_string(&Sample::SecondValue).unwrap(),
            "\"second_value\""
        );
        let parsed: Sample = serde_json::from_str("\"first\"").unwrap();
        assert_eq!(parsed, Sample::First);
    }

    #[test]
    fn test_string_enum_rejects_unknown() {
        let err = "third".parse::<Sample>().unwrap_err();
        assert!(err.contains("first, second_value"));
        assert!(serde_json::from_str::<Sample>("\"third\"").is_err());
    }
}
