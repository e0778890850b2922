use rand::Rng;

const REFERENCE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// 生成指定长度的随机码（去掉了易混淆的 0/O/1/I）
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..REFERENCE_CHARSET.len());
            REFERENCE_CHARSET[idx] as char
        })
        .collect()
}

/// 生成缴费流水号，如 `PAY-20250301-7KQ2MX`
pub fn generate_payment_reference() -> String {
    format!(
        "PAY-{}-{}",
        chrono::Utc::now().format("%Y%m%d"),
        generate_code(6)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code() {
        let code = generate_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| REFERENCE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_payment_reference_format() {
        let reference = generate_payment_reference();
        assert!(reference.starts_with("PAY-"));
        assert_eq!(reference.len(), "PAY-20250301-".len() + 6);
    }
}
