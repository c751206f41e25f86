//! Built-in dataset used when no knowledge file is configured.

use super::KnowledgeEntry;

const BUILTIN: [(&str, &str); 5] = [
    (
        "What does the eligibility verification agent (EVA) do?",
        "EVA automates the process of verifying a patient’s eligibility and benefits information in real-time, eliminating manual data entry errors and reducing claim rejections.",
    ),
    (
        "What does the claims processing agent (CAM) do?",
        "CAM streamlines the submission and management of claims, improving accuracy, reducing manual intervention, and accelerating reimbursements.",
    ),
    (
        "How does the payment posting agent (PHIL) work?",
        "PHIL automates the posting of payments to patient accounts, ensuring fast, accurate reconciliation of payments and reducing administrative burden.",
    ),
    (
        "Tell me about Thoughtful AI's Agents.",
        "Thoughtful AI provides a suite of AI-powered automation agents designed to streamline healthcare processes. These include Eligibility Verification (EVA), Claims Processing (CAM), and Payment Posting (PHIL), among others.",
    ),
    (
        "What are the benefits of using Thoughtful AI's agents?",
        "Using Thoughtful AI's Agents can significantly reduce administrative costs, improve operational efficiency, and reduce errors in critical processes like claims management and payment posting.",
    ),
];

/// Built-in entries in priority order.
pub fn builtin_entries() -> Vec<KnowledgeEntry> {
    BUILTIN
        .iter()
        .map(|(q, a)| KnowledgeEntry::new(*q, *a))
        .collect()
}
