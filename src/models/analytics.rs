//! Modelos de Analytics
//!
//! Este módulo contiene el reporte de ingresos agregado sobre los jobs
//! completados del ledger.

use serde::{Deserialize, Serialize};

use crate::models::job::{Job, JobStatus, JobType};

/// Resumen de ingresos: solo cuentan los jobs `completed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub ride_revenue: f64,
    pub delivery_revenue: f64,
    pub completed_jobs: usize,
    pub ride_count: usize,
    pub delivery_count: usize,
    pub avg_ride_fare: f64,
    pub avg_delivery_fare: f64,
}

impl RevenueReport {
    /// Agregar ingresos por tipo de job; pending/assigned/in_progress se ignoran
    pub fn from_jobs<'a, I>(jobs: I) -> Self
    where
        I: IntoIterator<Item = &'a Job>,
    {
        let mut report = RevenueReport::default();

        for job in jobs.into_iter().filter(|j| j.status == JobStatus::Completed) {
            report.total_revenue += job.fare_amount;
            report.completed_jobs += 1;
            match job.job_type {
                JobType::Ride => {
                    report.ride_revenue += job.fare_amount;
                    report.ride_count += 1;
                }
                JobType::Delivery => {
                    report.delivery_revenue += job.fare_amount;
                    report.delivery_count += 1;
                }
            }
        }

        if report.ride_count > 0 {
            report.avg_ride_fare = report.ride_revenue / report.ride_count as f64;
        }
        if report.delivery_count > 0 {
            report.avg_delivery_fare = report.delivery_revenue / report.delivery_count as f64;
        }

        report
    }
}
