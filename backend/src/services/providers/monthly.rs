//! Monthly count series: records created per month, one series per value of
//! a grouping field.

use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::algorithms::normalize_rows;
use crate::api::{ChartOptions, DataType, StatisticKey, StatisticResponse};
use crate::db::repository::RecordRepository;
use crate::models::{AxisDefinition, GenericQuery, QueryLimit};
use crate::services::chart::{build_series_response, empty_series_response};
use crate::services::context::extract_context;
use crate::services::criteria::build_base_query;
use crate::services::error::ServiceResult;
use crate::services::module_names::ModuleNameMapper;
use crate::services::registry::StatisticsProvider;
use crate::services::session::{LegacyRuntime, LegacySession};
use crate::services::translator::{MonthlyCountSpec, QueryTranslator};

/// Provider for a [`MonthlyCountSpec`] statistic scoped to one module.
pub struct MonthlyCountProvider {
    key: StatisticKey,
    module: String,
    spec: MonthlyCountSpec,
    repository: Arc<dyn RecordRepository>,
    module_names: Arc<dyn ModuleNameMapper>,
}

impl MonthlyCountProvider {
    pub fn new(
        key: impl Into<StatisticKey>,
        module: impl Into<String>,
        spec: MonthlyCountSpec,
        repository: Arc<dyn RecordRepository>,
        module_names: Arc<dyn ModuleNameMapper>,
    ) -> Self {
        Self {
            key: key.into(),
            module: module.into(),
            spec,
            repository,
            module_names,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn spec(&self) -> &MonthlyCountSpec {
        &self.spec
    }

    fn empty(&self) -> StatisticResponse {
        empty_series_response(self.key.clone())
    }
}

#[async_trait]
impl StatisticsProvider for MonthlyCountProvider {
    fn key(&self) -> &str {
        self.key.as_str()
    }

    async fn get_data(
        &self,
        query: &GenericQuery,
        runtime: &dyn LegacyRuntime,
    ) -> ServiceResult<StatisticResponse> {
        let context = extract_context(query);
        if context.is_empty() || context.module != self.module {
            debug!(
                "{}: module '{}' not supported, returning empty response",
                self.key, context.module
            );
            return Ok(self.empty());
        }

        let _session = LegacySession::open(runtime)?;

        let Some(legacy_name) = self.module_names.to_legacy(&context.module) else {
            debug!("{}: no legacy name for module '{}'", self.key, context.module);
            return Ok(self.empty());
        };

        let Some(record_type) = self.repository.record_type(&legacy_name) else {
            debug!("{}: unknown record type '{}'", self.key, legacy_name);
            return Ok(self.empty());
        };

        let base = build_base_query(&record_type, &context.criteria, &context.sort);
        let query = self.spec.translate(base);
        let rows = self
            .repository
            .run_query(&query, &record_type, QueryLimit::Unlimited)
            .await?;

        let axis = AxisDefinition::months();
        let series = normalize_rows(&rows, &axis, &self.spec.series_fields(), DataType::Int);
        debug!("{}: {} rows into {} series", self.key, rows.len(), series.len());

        let options = ChartOptions {
            x_axis_ticks: axis,
            y_axis_tick_formatting: true,
        };

        Ok(build_series_response(
            self.key.clone(),
            DataType::Int,
            series,
            options,
        ))
    }
}
