// src/services/admin_service.rs
//
// Autenticação de administrador: senha única (hash bcrypt vindo do ambiente)
// troca por um token assinado e com validade, registrado também no banco —
// logout revoga a sessão mesmo com o token ainda dentro do prazo.

use axum::http::{HeaderMap, header};
use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AdminRepository,
    models::admin::{AdminAuth, AdminSession, Claims, LoginResponse},
};

#[derive(Clone)]
pub struct AdminService {
    repo: AdminRepository,
    jwt_secret: String,
    admin_password_hash: String,
    session_hours: i64,
    cleanup_secret: Option<String>,
}

impl AdminService {
    pub fn new(
        repo: AdminRepository,
        jwt_secret: String,
        admin_password_hash: String,
        session_hours: i64,
        cleanup_secret: Option<String>,
    ) -> Self {
        Self {
            repo,
            jwt_secret,
            admin_password_hash,
            session_hours,
            cleanup_secret,
        }
    }

    pub async fn login(&self, senha: &str) -> Result<LoginResponse, AppError> {
        let senha_clone = senha.to_owned();
        let hash_clone = self.admin_password_hash.clone();

        // Executa a verificação em um thread separado
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha_clone, &hash_clone))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::InvalidCredentials);
        }

        // Sessões vencidas não ficam acumulando na tabela.
        self.repo.purge_expired(Utc::now()).await?;

        let agora = Utc::now();
        let expira_em = agora + chrono::Duration::hours(self.session_hours);
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: "admin".to_string(),
            jti: jti.clone(),
            iat: agora.timestamp() as usize,
            exp: expira_em.timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?;

        self.repo.insert_session(&jti, agora, expira_em).await?;
        tracing::info!("🔑 Sessão de administrador criada (expira em {})", expira_em);

        Ok(LoginResponse { token, expira_em })
    }

    /// Token válido = assinatura boa + sessão viva no banco.
    pub async fn validate_session(&self, token: &str) -> Result<AdminSession, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let sessao = self
            .repo
            .find_session(&token_data.claims.jti)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if sessao.expira_em < Utc::now() {
            self.repo.delete_session(&sessao.token_id).await?;
            return Err(AppError::InvalidToken);
        }
        Ok(sessao)
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.repo.delete_session(&token_data.claims.jti).await?;
        tracing::info!("👋 Sessão de administrador encerrada");
        Ok(())
    }

    /// Autoriza uma requisição administrativa: sessão Bearer ou o segredo
    /// compartilhado no header `x-admin-secret`.
    pub async fn authorize_headers(&self, headers: &HeaderMap) -> Result<AdminAuth, AppError> {
        if let Some(segredo) = self.cleanup_secret.as_deref() {
            if let Some(valor) = headers.get("x-admin-secret").and_then(|v| v.to_str().ok()) {
                if valor == segredo {
                    return Ok(AdminAuth::SegredoCompartilhado);
                }
            }
        }

        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match token {
            Some(token) => Ok(AdminAuth::Sessao(self.validate_session(token).await?)),
            None => Err(AppError::AdminRequired),
        }
    }

    pub async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
        self.authorize_headers(headers).await.is_ok()
    }
}
