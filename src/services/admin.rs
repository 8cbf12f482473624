//! 管理入口门禁 - 业务能力层
//!
//! 统计查看 / 重置入口的凭据校验。凭据来自配置（环境变量），
//! 不在代码中硬编码。仅供个人使用，明确不是安全边界

use crate::config::Config;

/// 管理门禁
pub struct AdminGate {
    email: String,
    password: String,
}

impl AdminGate {
    /// 从配置创建门禁
    pub fn new(config: &Config) -> Self {
        Self {
            email: config.admin_email.clone(),
            password: config.admin_password.clone(),
        }
    }

    /// 校验凭据
    ///
    /// 未配置凭据（任一为空）时一律拒绝
    pub fn verify(&self, email: &str, password: &str) -> bool {
        !self.email.is_empty()
            && !self.password.is_empty()
            && self.email == email
            && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(email: &str, password: &str) -> AdminGate {
        AdminGate::new(&Config {
            admin_email: email.to_string(),
            admin_password: password.to_string(),
            ..Config::default()
        })
    }

    #[test]
    fn test_accepts_exact_credentials() {
        let gate = gate("admin@example.com", "s3cret");
        assert!(gate.verify("admin@example.com", "s3cret"));
    }

    #[test]
    fn test_rejects_wrong_credentials() {
        let gate = gate("admin@example.com", "s3cret");
        assert!(!gate.verify("admin@example.com", "wrong"));
        assert!(!gate.verify("other@example.com", "s3cret"));
        assert!(!gate.verify("", ""));
    }

    #[test]
    fn test_rejects_when_unconfigured() {
        let gate = gate("", "");
        // 未配置时即使传入空串也拒绝
        assert!(!gate.verify("", ""));
    }
}
