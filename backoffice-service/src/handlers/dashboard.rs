//! Dashboard stats and the sold-vehicle history with profit figures.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use std::collections::HashMap;
use uuid::Uuid;

use service_core::error::AppError;

use crate::dtos::dashboard::{DashboardStatsResponse, HistoryItem, HistoryParams};
use crate::dtos::responses::{format_datetime, PaymentSummaryResponse};
use crate::middleware::AdminContext;
use crate::models::{CarStatus, Money, Payment, SellRequestStatus};
use crate::startup::AppState;

/// GET /api/admin/dashboard-stats
pub async fn stats(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<DashboardStatsResponse>, AppError> {
    let pending_requests = state
        .repository
        .count_sell_requests(SellRequestStatus::Pending)
        .await?;
    let approved_requests = state
        .repository
        .count_sell_requests(SellRequestStatus::Approved)
        .await?;
    let rejected_requests = state
        .repository
        .count_sell_requests(SellRequestStatus::Rejected)
        .await?;
    let live_cars = state.repository.count_cars(CarStatus::Live).await?;
    let sold_cars = state.repository.count_cars(CarStatus::Sold).await?;

    let total_revenue = state
        .repository
        .list_sales()
        .await?
        .iter()
        .fold(Money::ZERO, |sum, sale| {
            sum.saturating_add(sale.payment_summary.paid_amount)
        });

    Ok(Json(DashboardStatsResponse {
        pending_requests,
        approved_requests,
        rejected_requests,
        live_cars,
        sold_cars,
        total_revenue,
    }))
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(anyhow::anyhow!("Invalid {field} (expected YYYY-MM-DD)")))
}

/// GET /api/admin/history: sold vehicles with money trail and profit.
pub async fn history(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryItem>>, AppError> {
    let source_filter = params
        .source
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());
    let from_date = params
        .from_date
        .as_deref()
        .map(|raw| parse_date(raw, "fromDate"))
        .transpose()?;
    let to_date = params
        .to_date
        .as_deref()
        .map(|raw| parse_date(raw, "toDate"))
        .transpose()?;

    let sales = state.repository.list_sales().await?;
    let sold_cars: HashMap<Uuid, _> = state
        .repository
        .list_cars_by_status(CarStatus::Sold)
        .await?
        .into_iter()
        .map(|car| (car.id, car))
        .collect();

    let sale_ids: Vec<Uuid> = sales.iter().map(|sale| sale.id).collect();
    let mut payments_by_sale: HashMap<Uuid, Vec<Payment>> = HashMap::new();
    for payment in state.repository.list_payments_for_sales(&sale_ids).await? {
        payments_by_sale
            .entry(payment.sale_id)
            .or_default()
            .push(payment);
    }

    let mut items = Vec::new();
    for sale in sales {
        let Some(car) = sold_cars.get(&sale.car_id) else {
            continue;
        };

        if let Some(filter) = &source_filter {
            let source = match car.source {
                crate::models::Source::Online => "ONLINE",
                crate::models::Source::Offline => "OFFLINE",
            };
            if source != filter {
                continue;
            }
        }
        if let Some(sold_at) = car.sold_at {
            let sold_date = sold_at.to_chrono().date_naive();
            if from_date.is_some_and(|from| sold_date < from) {
                continue;
            }
            if to_date.is_some_and(|to| sold_date > to) {
                continue;
            }
        }

        let total_admin_expense = car
            .admin_expenses
            .iter()
            .fold(Money::ZERO, |sum, line| sum.saturating_add(line.amount));
        let seller_price = car.seller_price;
        let buyer_price = car.buyer_price;
        let profit_before_expense = buyer_price
            .unwrap_or(Money::ZERO)
            .checked_sub(seller_price)
            .unwrap_or(Money::ZERO);
        let net_profit = profit_before_expense
            .checked_sub(total_admin_expense)
            .unwrap_or(Money::ZERO);

        items.push(HistoryItem {
            id: car.id,
            car: car.car.clone(),
            source: car.source,
            sold_at: car.sold_at.map(format_datetime),
            rc_details: car.rc_details.clone(),
            seller: car.seller.clone(),
            buyer: car.buyer.clone(),
            seller_price,
            admin_selling_price: car.admin_selling_price,
            buyer_price,
            sale_id: sale.id,
            payment_summary: PaymentSummaryResponse::from(&sale.payment_summary),
            payments: payments_by_sale
                .remove(&sale.id)
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            admin_expenses: car.admin_expenses.clone(),
            total_admin_expense,
            profit_before_expense,
            net_profit,
        });
    }

    Ok(Json(items))
}
