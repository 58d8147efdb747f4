use crate::models::DiseaseRisk;

/// Concatenates classifier risks and screening risks, then orders by
/// descending probability.
///
/// The sort is stable, so risks with equal probability keep their
/// concatenation order (classifier risks first).
pub fn aggregate(classifier: Vec<DiseaseRisk>, screening: Vec<DiseaseRisk>) -> Vec<DiseaseRisk> {
    let mut risks = classifier;
    risks.extend(screening);
    risks.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    risks
}
