//! Built-in symbol taxonomy.

use super::{SymbolCategory, SymbolEntry};
use std::borrow::Cow;

const fn sym(label: &'static str, latex: &'static str, title: &'static str) -> SymbolEntry {
    SymbolEntry {
        label: Cow::Borrowed(label),
        latex: Cow::Borrowed(latex),
        title: Cow::Borrowed(title),
    }
}

const fn category(name: &'static str, symbols: &'static [SymbolEntry]) -> SymbolCategory {
    SymbolCategory {
        name: Cow::Borrowed(name),
        symbols: Cow::Borrowed(symbols),
    }
}

const BASIC: &[SymbolEntry] = &[
    sym("x²", "x^{2}", "Superscript"),
    sym("xₙ", "x_{n}", "Subscript"),
    sym("a/b", "\\frac{a}{b}", "Fraction"),
    sym("√", "\\sqrt{x}", "Square root"),
    sym("ⁿ√", "\\sqrt[n]{x}", "Nth root"),
    sym("±", "\\pm", "Plus or minus"),
    sym("×", "\\times", "Multiplication"),
    sym("÷", "\\div", "Division"),
    sym("·", "\\cdot", "Dot product"),
    sym("|x|", "\\left| x \\right|", "Absolute value"),
];

const GREEK: &[SymbolEntry] = &[
    sym("α", "\\alpha", "Alpha"),
    sym("β", "\\beta", "Beta"),
    sym("γ", "\\gamma", "Gamma"),
    sym("δ", "\\delta", "Delta"),
    sym("ε", "\\epsilon", "Epsilon"),
    sym("θ", "\\theta", "Theta"),
    sym("λ", "\\lambda", "Lambda"),
    sym("μ", "\\mu", "Mu"),
    sym("π", "\\pi", "Pi"),
    sym("σ", "\\sigma", "Sigma"),
    sym("φ", "\\phi", "Phi"),
    sym("ω", "\\omega", "Omega"),
    sym("Δ", "\\Delta", "Capital delta"),
    sym("Σ", "\\Sigma", "Capital sigma"),
    sym("Ω", "\\Omega", "Capital omega"),
];

const RELATIONS: &[SymbolEntry] = &[
    sym("≠", "\\neq", "Not equal"),
    sym("≈", "\\approx", "Approximately equal"),
    sym("≤", "\\leq", "Less than or equal"),
    sym("≥", "\\geq", "Greater than or equal"),
    sym("≡", "\\equiv", "Equivalent"),
    sym("∝", "\\propto", "Proportional to"),
    sym("∼", "\\sim", "Similar to"),
];

const CALCULUS: &[SymbolEntry] = &[
    sym("∑", "\\sum_{i=1}^{n}", "Summation"),
    sym("∏", "\\prod_{i=1}^{n}", "Product"),
    sym("∫", "\\int_{a}^{b}", "Integral"),
    sym("∮", "\\oint", "Contour integral"),
    sym("lim", "\\lim_{x \\to \\infty}", "Limit"),
    sym("∂", "\\partial", "Partial derivative"),
    sym("d/dx", "\\frac{d}{dx}", "Derivative"),
    sym("∞", "\\infty", "Infinity"),
    sym("∇", "\\nabla", "Nabla"),
];

const SETS: &[SymbolEntry] = &[
    sym("∈", "\\in", "Element of"),
    sym("∉", "\\notin", "Not an element of"),
    sym("⊂", "\\subset", "Subset"),
    sym("⊆", "\\subseteq", "Subset or equal"),
    sym("∪", "\\cup", "Union"),
    sym("∩", "\\cap", "Intersection"),
    sym("∅", "\\emptyset", "Empty set"),
    sym("ℝ", "\\mathbb{R}", "Real numbers"),
    sym("ℕ", "\\mathbb{N}", "Natural numbers"),
    sym("∀", "\\forall", "For all"),
    sym("∃", "\\exists", "There exists"),
    sym("¬", "\\neg", "Negation"),
    sym("∧", "\\land", "Logical and"),
    sym("∨", "\\lor", "Logical or"),
];

const ARROWS: &[SymbolEntry] = &[
    sym("→", "\\rightarrow", "Right arrow"),
    sym("←", "\\leftarrow", "Left arrow"),
    sym("↔", "\\leftrightarrow", "Left-right arrow"),
    sym("⇒", "\\Rightarrow", "Implies"),
    sym("⇔", "\\Leftrightarrow", "If and only if"),
    sym("↦", "\\mapsto", "Maps to"),
];

const FUNCTIONS: &[SymbolEntry] = &[
    sym("sin", "\\sin", "Sine"),
    sym("cos", "\\cos", "Cosine"),
    sym("tan", "\\tan", "Tangent"),
    sym("log", "\\log", "Logarithm"),
    sym("ln", "\\ln", "Natural logarithm"),
    sym("eˣ", "e^{x}", "Exponential"),
    sym("vec", "\\vec{v}", "Vector"),
    sym("x̄", "\\bar{x}", "Mean"),
    sym("n!", "n!", "Factorial"),
    sym("(n k)", "\\binom{n}{k}", "Binomial coefficient"),
];

/// The built-in categories, in display order.
pub static BUILTIN: &[SymbolCategory] = &[
    category("Basic", BASIC),
    category("Greek", GREEK),
    category("Relations", RELATIONS),
    category("Calculus", CALCULUS),
    category("Sets & Logic", SETS),
    category("Arrows", ARROWS),
    category("Functions", FUNCTIONS),
];
