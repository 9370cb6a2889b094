// src/services/finance_service.rs
//
// O coração do módulo financeiro: criação com heurísticas de duplicata,
// liquidação sequencial de parcelas, baixas parciais e limpeza com backup.
// Todos os caminhos com mais de uma consulta rodam dentro de uma transação
// do banco (ler-alterar-gravar, não checar-e-agir solto).

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction as DbTransaction};

use crate::{
    common::{error::AppError, normalize},
    db::FinanceRepository,
    models::finance::{
        CreateTransactionPayload, FinanceCleanupPayload, FinanceCleanupResponse, NewTransaction,
        PartialPayment, RegisterPartialPayload, Transaction, TransactionStatus,
        UpdateTransactionPayload,
    },
    services::cleanup_service::escrever_backup,
};

#[derive(Clone)]
pub struct FinanceService {
    repo: FinanceRepository,
    pool: SqlitePool,
    backup_dir: PathBuf,
}

impl FinanceService {
    pub fn new(repo: FinanceRepository, pool: SqlitePool, backup_dir: PathBuf) -> Self {
        Self {
            repo,
            pool,
            backup_dir,
        }
    }

    /// Lista tudo, depois de virar para 'atrasado' o que passou do vencimento.
    pub async fn list(&self) -> Result<Vec<Transaction>, AppError> {
        let hoje = Utc::now().date_naive();
        let viradas = self.repo.mark_overdue(&self.pool, hoje).await?;
        if viradas > 0 {
            tracing::info!("⏰ {} transação(ões) marcada(s) como atrasada(s)", viradas);
        }
        self.repo.list_all(&self.pool).await
    }

    pub async fn get(&self, id: i64) -> Result<Transaction, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Transação não encontrada"))
    }

    /// Cria uma transação. Devolve `(criada, linha)`: `criada = false` quando
    /// uma linha existente foi reaproveitada (retry idempotente ou duplicata
    /// de orçamento).
    pub async fn create(
        &self,
        payload: CreateTransactionPayload,
    ) -> Result<(bool, Transaction), AppError> {
        let tipo = payload.tipo.ok_or(AppError::MissingField("tipo"))?;
        let valor = match &payload.valor {
            Some(bruto) => normalize::normalizar_valor(bruto)
                .ok_or_else(|| AppError::InvalidAmount(format!("{:?}", bruto)))?,
            None => return Err(AppError::MissingField("valor")),
        };
        if valor <= 0.0 {
            return Err(AppError::InvalidAmount(
                "valor deve ser maior que zero".to_string(),
            ));
        }
        let data = match &payload.data {
            Some(bruta) => normalize::normalizar_data(bruta)
                .ok_or_else(|| AppError::InvalidDate(bruta.clone()))?,
            None => return Err(AppError::MissingField("data")),
        };
        let vencimento = normalizar_data_opcional(payload.vencimento.as_deref())?;

        // Linhas de parcelamento escapam da heurística de duplicata: várias
        // linhas por orçamento são esperadas.
        let parcelado = payload.parcelado.unwrap_or(false)
            || payload.grupo_parcelamento_id.is_some()
            || payload.numero_parcela.is_some();

        let nova = NewTransaction {
            id: payload.id,
            orcamento_id: payload.orcamento_id,
            cliente_id: payload.cliente_id,
            descricao: payload.descricao.unwrap_or_default(),
            tipo,
            valor,
            data,
            vencimento,
            status: payload.status.unwrap_or(TransactionStatus::Aberto),
            observacoes: payload.observacoes.unwrap_or_default(),
            fornecedor: payload.fornecedor,
            forma_pagamento: payload.forma_pagamento,
            parcelado,
            numero_parcela: payload.numero_parcela,
            total_parcelas: payload.total_parcelas,
            grupo_parcelamento_id: payload.grupo_parcelamento_id,
        };

        let mut tx = self.pool.begin().await?;

        if let Some(id) = nova.id {
            if let Some(existente) = self.repo.find_by_id(&mut *tx, id).await? {
                tx.commit().await?;
                return Ok((false, existente));
            }
        }

        if !nova.parcelado {
            if let Some(orcamento_id) = nova.orcamento_id {
                if let Some(existente) =
                    self.repo.find_open_by_quote(&mut *tx, orcamento_id).await?
                {
                    tx.commit().await?;
                    return Ok((false, existente));
                }
            }
        }

        let criada = self.repo.insert(&mut *tx, &nova).await?;
        tx.commit().await?;
        Ok((true, criada))
    }

    /// Mutação parcial: só os campos presentes no payload mudam. A transição
    /// para 'pago' passa pela trava de sequenciamento de parcelas.
    pub async fn update(
        &self,
        id: i64,
        payload: UpdateTransactionPayload,
    ) -> Result<Transaction, AppError> {
        let valor = match &payload.valor {
            Some(bruto) => {
                let v = normalize::normalizar_valor(bruto)
                    .ok_or_else(|| AppError::InvalidAmount(format!("{:?}", bruto)))?;
                if v <= 0.0 {
                    return Err(AppError::InvalidAmount(
                        "valor deve ser maior que zero".to_string(),
                    ));
                }
                Some(v)
            }
            None => None,
        };
        let data = normalizar_data_opcional(payload.data.as_deref())?;
        let vencimento = normalizar_data_opcional(payload.vencimento.as_deref())?;
        let data_pagamento = normalizar_data_opcional(payload.data_pagamento.as_deref())?;

        let mut tx = self.pool.begin().await?;
        let mut transacao = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Transação não encontrada"))?;

        if payload.orcamento_id.is_some() {
            transacao.orcamento_id = payload.orcamento_id;
        }
        if payload.cliente_id.is_some() {
            transacao.cliente_id = payload.cliente_id;
        }
        if let Some(descricao) = payload.descricao {
            transacao.descricao = descricao;
        }
        if let Some(tipo) = payload.tipo {
            transacao.tipo = tipo;
        }
        if let Some(valor) = valor {
            transacao.valor = valor;
        }
        if let Some(data) = data {
            transacao.data = data;
        }
        if vencimento.is_some() {
            transacao.vencimento = vencimento;
        }
        if let Some(observacoes) = payload.observacoes {
            transacao.observacoes = observacoes;
        }
        if payload.fornecedor.is_some() {
            transacao.fornecedor = payload.fornecedor;
        }
        if payload.forma_pagamento.is_some() {
            transacao.forma_pagamento = payload.forma_pagamento;
        }
        if payload.numero_parcela.is_some() {
            transacao.numero_parcela = payload.numero_parcela;
            transacao.parcelado = true;
        }
        if payload.total_parcelas.is_some() {
            transacao.total_parcelas = payload.total_parcelas;
        }
        if payload.grupo_parcelamento_id.is_some() {
            transacao.grupo_parcelamento_id = payload.grupo_parcelamento_id;
            transacao.parcelado = true;
        }

        let status_anterior = transacao.status;
        if let Some(status) = payload.status {
            transacao.status = status;
        }

        if transacao.status == TransactionStatus::Pago
            && status_anterior != TransactionStatus::Pago
        {
            self.checar_sequencia(&mut tx, &transacao).await?;
            let quitacao = data_pagamento.unwrap_or_else(|| Utc::now().date_naive());
            transacao.data_pagamento = Some(quitacao);
            transacao.valor_pago = transacao.valor;
        } else if data_pagamento.is_some() {
            transacao.data_pagamento = data_pagamento;
        }

        self.repo.update_row(&mut *tx, &transacao).await?;
        tx.commit().await?;
        Ok(transacao)
    }

    /// Registra uma baixa parcial. Quando o acumulado cobre o valor da
    /// transação, a liquidação final também respeita a ordem das parcelas.
    pub async fn register_partial(
        &self,
        id: i64,
        payload: RegisterPartialPayload,
    ) -> Result<(Transaction, PartialPayment), AppError> {
        let valor_pago = match &payload.valor_pago {
            Some(bruto) => normalize::normalizar_valor(bruto)
                .ok_or_else(|| AppError::InvalidAmount(format!("{:?}", bruto)))?,
            None => return Err(AppError::MissingField("valorPago")),
        };
        if valor_pago <= 0.0 {
            return Err(AppError::InvalidAmount(
                "valorPago deve ser maior que zero".to_string(),
            ));
        }
        let data_pagamento = normalizar_data_opcional(payload.data_pagamento.as_deref())?
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;
        let mut transacao = self
            .repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Transação não encontrada"))?;

        if transacao.status == TransactionStatus::Pago {
            return Err(AppError::Conflict("Transação já liquidada".to_string()));
        }

        let pagamento = self
            .repo
            .insert_partial(
                &mut *tx,
                id,
                valor_pago,
                data_pagamento,
                payload.observacoes.as_deref(),
            )
            .await?;

        transacao.valor_pago += valor_pago;
        transacao.ultimo_pagamento_parcial = Some(data_pagamento);

        // Tolerância de meio centavo na comparação de ponto flutuante.
        if transacao.valor_pago + 0.005 >= transacao.valor {
            self.checar_sequencia(&mut tx, &transacao).await?;
            transacao.status = TransactionStatus::Pago;
            transacao.data_pagamento = Some(data_pagamento);
        } else {
            transacao.status = TransactionStatus::Parcial;
        }

        self.repo.update_row(&mut *tx, &transacao).await?;
        tx.commit().await?;
        Ok((transacao, pagamento))
    }

    pub async fn list_partials(&self, id: i64) -> Result<Vec<PartialPayment>, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::NotFound("Transação não encontrada"))?;
        self.repo.list_partials(&self.pool, id).await
    }

    /// Apaga uma transação, gravando antes um backup JSON da linha.
    pub async fn delete_with_backup(&self, id: i64) -> Result<PathBuf, AppError> {
        let transacao = self.get(id).await?;
        let linhas = serde_json::to_value(vec![&transacao]).map_err(anyhow::Error::from)?;
        let backup = escrever_backup(&self.backup_dir, "transacoes", &linhas).await?;
        self.repo.delete(&self.pool, id).await?;
        tracing::info!("🗑️ Transação {} removida (backup em {})", id, backup.display());
        Ok(backup)
    }

    /// Expurgo em massa: exige confirmação explícita e grava o snapshot das
    /// linhas exatas que vão sumir antes do DELETE.
    pub async fn cleanup(
        &self,
        payload: FinanceCleanupPayload,
    ) -> Result<FinanceCleanupResponse, AppError> {
        if !payload.confirm.unwrap_or(false) {
            return Err(AppError::ConfirmationRequired);
        }

        let mut tx = self.pool.begin().await?;
        let alvo = self
            .repo
            .list_filtered(&mut *tx, payload.tipo, payload.status)
            .await?;
        if alvo.is_empty() {
            tx.commit().await?;
            return Ok(FinanceCleanupResponse {
                removidos: 0,
                backup: None,
            });
        }

        let linhas = serde_json::to_value(&alvo).map_err(anyhow::Error::from)?;
        let backup = escrever_backup(&self.backup_dir, "transacoes", &linhas).await?;
        let removidos = self
            .repo
            .delete_filtered(&mut *tx, payload.tipo, payload.status)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "🧹 Cleanup financeiro: {} registro(s) removido(s), backup em {}",
            removidos,
            backup.display()
        );
        Ok(FinanceCleanupResponse {
            removidos,
            backup: Some(backup.display().to_string()),
        })
    }

    /// Trava de sequenciamento: parcela N só liquida com a N-1 paga. A
    /// parcela anterior é localizada pelo grupo de parcelamento e, na falta
    /// dele, pelo orçamento. Sem anterior localizável, segue sem restrição.
    async fn checar_sequencia(
        &self,
        tx: &mut DbTransaction<'_, Sqlite>,
        transacao: &Transaction,
    ) -> Result<(), AppError> {
        let Some(numero) = transacao.numero_parcela else {
            return Ok(());
        };
        if numero <= 1 {
            return Ok(());
        }
        let numero_anterior = numero - 1;

        let mut anterior = None;
        if let Some(grupo) = transacao.grupo_parcelamento_id.as_deref() {
            anterior = self
                .repo
                .find_installment_in_group(&mut **tx, grupo, numero_anterior)
                .await?;
        }
        if anterior.is_none() {
            if let Some(orcamento_id) = transacao.orcamento_id {
                anterior = self
                    .repo
                    .find_installment_by_quote(&mut **tx, orcamento_id, numero_anterior)
                    .await?;
            }
        }

        if let Some(anterior) = anterior {
            if anterior.status != TransactionStatus::Pago {
                return Err(AppError::InstallmentOutOfSequence {
                    anterior: numero_anterior,
                    status_anterior: anterior.status.as_str().to_string(),
                });
            }
        }
        Ok(())
    }
}

fn normalizar_data_opcional(bruta: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match bruta {
        Some(s) if !s.trim().is_empty() => normalize::normalizar_data(s)
            .map(Some)
            .ok_or_else(|| AppError::InvalidDate(s.to_string())),
        _ => Ok(None),
    }
}
