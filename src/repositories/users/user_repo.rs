//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB `users` 컬렉션에 대한 조회/생성/갱신 연산을 제공하며,
//! 이메일과 휴대폰 번호의 유일성을 유니크 인덱스로 보장합니다.
//!
//! ## 인덱스
//!
//! - `email` (오름차순, UNIQUE)
//! - `number` (오름차순, UNIQUE)
//! - `createdAt` (내림차순)
//!
//! ## 에러 처리
//!
//! 모든 메서드는 `Result<T, AppError>`를 반환합니다.
//!
//! - **DatabaseError**: MongoDB 연결/질의 오류
//! - **InvalidInput**: 이메일/번호 중복 등 비즈니스 규칙 위반
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! let repo = UserRepository::new(database);
//!
//! let user = repo.find_by_number(9999999999).await?;
//! let by_email = repo.find_by_email("gildong@example.com").await?;
//! ```

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::db::Database;
use crate::domain::entities::users::{OtpRecord, User};
use crate::errors::AppError;

/// 사용자 데이터 액세스 리포지토리
///
/// 생성자 주입으로 데이터베이스 핸들을 받아 `users` 컬렉션에 대한
/// 모든 MongoDB 연산을 담당합니다.
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,
}

impl UserRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// `users` 컬렉션 핸들을 반환합니다.
    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection("users")
    }

    /// 이메일 주소로 사용자 조회
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 이메일의 사용자가 없는 경우
    /// * `Err(AppError)` - 데이터베이스 오류
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 휴대폰 번호로 사용자 조회
    ///
    /// 번호는 시스템 전체에서 유니크하므로 최대 1개의 결과만 반환됩니다.
    pub async fn find_by_number(&self, number: i64) -> Result<Option<User>, AppError> {
        self.collection()
            .find_one(doc! { "number": number })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// ID로 사용자 조회
    ///
    /// 라우트 파라미터는 스키마 검증으로 ObjectId 형식이 보장되므로,
    /// 여기서의 파싱 실패는 내부 오류로 취급합니다.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::InternalError(format!("잘못된 ObjectId: {}", id)))?;

        self.collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 새 사용자 생성
    ///
    /// 이메일과 휴대폰 번호의 중복 여부를 사전에 검증하고 저장합니다.
    /// 동시 요청으로 사전 검증을 통과하더라도 유니크 인덱스가 최종적으로
    /// 중복을 차단합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 생성된 사용자 (ID 포함)
    /// * `Err(AppError::InvalidInput)` - 이메일 또는 번호 중복
    /// * `Err(AppError::DatabaseError)` - 데이터베이스 오류
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "User is Already Registered with this email: {}",
                user.email
            )));
        }

        if self.find_by_number(user.number).await?.is_some() {
            return Err(AppError::InvalidInput(format!(
                "User is Already Registered with this number: {}",
                user.number
            )));
        }

        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        user.id = result.inserted_id.as_object_id();

        Ok(user)
    }

    /// 사용자 프로필 부분 갱신
    ///
    /// 전달된 필드만 `$set` 연산으로 변경합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(true)` - 갱신된 사용자가 존재함
    /// * `Ok(false)` - 해당 ID의 사용자가 없음
    pub async fn update_profile(&self, id: &str, update: Document) -> Result<bool, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::InternalError(format!("잘못된 ObjectId: {}", id)))?;

        let result = self
            .collection()
            .update_one(doc! { "_id": object_id }, doc! { "$set": update })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.matched_count == 1)
    }

    /// OTP 레코드 저장
    ///
    /// 기존 OTP가 있으면 덮어씁니다. 재발급은 대기열이 아니라 교체입니다.
    pub async fn set_otp(&self, number: i64, record: &OtpRecord) -> Result<(), AppError> {
        let otp_doc = mongodb::bson::to_bson(record)
            .map_err(|e| AppError::InternalError(format!("OTP 직렬화 실패: {}", e)))?;

        self.collection()
            .update_one(doc! { "number": number }, doc! { "$set": { "otp": otp_doc } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// OTP 소비와 함께 비밀번호 갱신
    ///
    /// 비밀번호 저장과 OTP 제거를 한 번의 원자적 갱신으로 수행하여
    /// 성공한 비밀번호 설정 이후 동일 코드가 재사용될 수 없게 합니다.
    pub async fn set_password_and_clear_otp(
        &self,
        number: i64,
        password_hash: &str,
    ) -> Result<(), AppError> {
        self.collection()
            .update_one(
                doc! { "number": number },
                doc! {
                    "$set": { "password": password_hash },
                    "$unset": { "otp": "" },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// ID 기준 비밀번호 갱신 (인증된 비밀번호 변경용)
    pub async fn set_password_by_id(
        &self,
        id: &str,
        password_hash: &str,
    ) -> Result<(), AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::InternalError(format!("잘못된 ObjectId: {}", id)))?;

        self.collection()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": { "password": password_hash } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    /// 필터 조건으로 사용자 목록 조회
    ///
    /// 호출자가 전달한 조회 조건을 그대로 사용합니다.
    pub async fn list(&self, filter: Document) -> Result<Vec<User>, AppError> {
        let cursor = self
            .collection()
            .find(filter)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행하여 유니크 제약과
    /// 조회 성능을 보장합니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        // 휴대폰 번호 유니크 인덱스
        let number_index = IndexModel::builder()
            .keys(doc! { "number": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("number_unique".to_string())
                    .build(),
            )
            .build();

        // 생성일 인덱스
        let created_at_index = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.collection()
            .create_indexes([email_index, number_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
