//! 인증된 사용자 표현
//!
//! 인증 미들웨어가 토큰 검증에 성공하면 Request Extensions에 저장하는
//! 경량 구조체입니다. 다운스트림 핸들러는 이 값을 통해 요청 주체의
//! 신원과 역할을 확인합니다.

use crate::domain::entities::users::Role;

/// 검증된 토큰에서 추출한 요청 주체 정보
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// 사용자 ID (ObjectId 16진수 문자열)
    pub user_id: String,
    /// 사용자 역할
    pub role: Role,
}

impl AuthenticatedUser {
    /// 관리자 여부 확인
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// 주어진 역할 목록 중 하나에 해당하는지 확인합니다.
    ///
    /// 빈 목록은 모든 인증된 사용자를 허용한다는 의미입니다.
    pub fn satisfies(&self, required_roles: &[Role]) -> bool {
        required_roles.is_empty() || required_roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let admin = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439011".to_string(),
            role: Role::Admin,
        };
        let user = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439012".to_string(),
            role: Role::User,
        };

        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_satisfies_role_set() {
        let user = AuthenticatedUser {
            user_id: "507f1f77bcf86cd799439012".to_string(),
            role: Role::User,
        };

        // 빈 목록은 인증만 요구한다
        assert!(user.satisfies(&[]));
        assert!(user.satisfies(&[Role::User, Role::Admin]));
        assert!(!user.satisfies(&[Role::Admin]));
    }
}
