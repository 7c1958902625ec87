/// Ready-to-run demonstrations of law generation, selected by number:
/// 0 mass action, 1 enzyme kinetics, 2 gene regulation, 3 rank and convenience kinetics,
/// 4 choosing a mechanism for one reaction
pub mod law_examples;
