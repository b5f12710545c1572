//! The built-in interview question catalog.
//!
//! Categories and their questions are a fixed in-memory table constructed
//! once at startup and passed by reference to whichever component needs it.
//! There is no mutation API.

use serde::{Deserialize, Serialize};

/// Difficulty level of an interview question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Returns the difficulty identifier as used on the wire and in display.
    pub fn id(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Parses a difficulty identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "beginner" => Some(Difficulty::Beginner),
            "intermediate" => Some(Difficulty::Intermediate),
            "advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// A single interview question.
#[derive(Debug, Clone)]
pub struct Question {
    /// Unique identifier within the catalog
    pub id: String,
    /// The prompt read to the user
    pub prompt: &'static str,
    /// Title of the owning category
    pub category: &'static str,
    /// Difficulty level
    pub difficulty: Difficulty,
}

/// A category of interview questions.
#[derive(Debug, Clone)]
pub struct Category {
    /// Unique identifier within the catalog
    pub id: &'static str,
    /// Display title
    pub title: &'static str,
    /// One-line description shown in the category picker
    pub description: &'static str,
    /// Glyph shown next to the title in the picker
    pub icon: &'static str,
    /// Questions in presentation order
    pub questions: Vec<Question>,
}

/// The immutable question catalog.
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// Returns all categories in presentation order.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Builds the built-in catalog.
    pub fn builtin() -> Self {
        let categories = vec![
            Category {
                id: "algorithms",
                title: "Algorithms",
                description: "Sorting, searching and complexity analysis",
                icon: "ƒ",
                questions: questions(
                    "Algorithms",
                    "algo",
                    &[
                        (
                            "Explain the difference between linear search and binary search. When would you use each?",
                            Difficulty::Beginner,
                        ),
                        (
                            "What does it mean for a sorting algorithm to be stable? Name one stable and one unstable sort.",
                            Difficulty::Beginner,
                        ),
                        (
                            "Walk through how quicksort works and discuss its best, average and worst case complexity.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Describe a problem you solved with dynamic programming and how you identified the subproblems.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "How would you detect a cycle in a directed graph, and what is the complexity of your approach?",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
            Category {
                id: "data-structures",
                title: "Data Structures",
                description: "Arrays, trees, hash tables and when to reach for each",
                icon: "⌗",
                questions: questions(
                    "Data Structures",
                    "ds",
                    &[
                        (
                            "What is the difference between an array and a linked list? Give a use case for each.",
                            Difficulty::Beginner,
                        ),
                        (
                            "How does a hash table handle collisions? Describe two strategies.",
                            Difficulty::Beginner,
                        ),
                        (
                            "Explain how a balanced binary search tree stays balanced, using any self-balancing tree you know.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Compare a heap and a sorted array for implementing a priority queue.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Design a data structure that supports insert, delete and get-random in constant time.",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
            Category {
                id: "system-design",
                title: "System Design",
                description: "Architecture, scaling and trade-off discussions",
                icon: "◫",
                questions: questions(
                    "System Design",
                    "sys",
                    &[
                        (
                            "What is a load balancer and why would you put one in front of a web service?",
                            Difficulty::Beginner,
                        ),
                        (
                            "Explain the difference between vertical and horizontal scaling.",
                            Difficulty::Beginner,
                        ),
                        (
                            "Design a URL shortener. Walk through the data model and the read path.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "How would you add caching to a read-heavy service, and what invalidation strategy would you pick?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Design a rate limiter for a public API. Discuss where it lives and how it behaves under burst load.",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
            Category {
                id: "behavioral",
                title: "Behavioral",
                description: "Teamwork, conflict and ownership stories",
                icon: "☰",
                questions: questions(
                    "Behavioral",
                    "beh",
                    &[
                        (
                            "Tell me about a time you had to learn a new technology quickly. How did you approach it?",
                            Difficulty::Beginner,
                        ),
                        (
                            "Describe a situation where you disagreed with a teammate. How was it resolved?",
                            Difficulty::Beginner,
                        ),
                        (
                            "Tell me about a project that failed or missed its deadline. What did you change afterwards?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Describe a time you took ownership of a problem outside your area of responsibility.",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Tell me about the most difficult technical decision you drove and how you handled pushback.",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
            Category {
                id: "javascript",
                title: "JavaScript",
                description: "Language semantics, async and the runtime",
                icon: "{}",
                questions: questions(
                    "JavaScript",
                    "js",
                    &[
                        (
                            "What is the difference between var, let and const?",
                            Difficulty::Beginner,
                        ),
                        (
                            "Explain what a closure is and give an example of where one is useful.",
                            Difficulty::Beginner,
                        ),
                        (
                            "How does the event loop schedule promises versus setTimeout callbacks?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "What is prototypal inheritance and how does it differ from classical inheritance?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Explain how you would find and fix a memory leak in a long-running Node.js service.",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
            Category {
                id: "python",
                title: "Python",
                description: "Idioms, data model and concurrency",
                icon: "≡",
                questions: questions(
                    "Python",
                    "py",
                    &[
                        (
                            "What is the difference between a list and a tuple, and when would you use each?",
                            Difficulty::Beginner,
                        ),
                        (
                            "Explain list comprehensions and rewrite a simple for-loop as one.",
                            Difficulty::Beginner,
                        ),
                        (
                            "What are decorators and how would you write one that times a function?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "How do generators differ from regular functions, and when do they save memory?",
                            Difficulty::Intermediate,
                        ),
                        (
                            "Explain the global interpreter lock and its consequences for CPU-bound concurrency.",
                            Difficulty::Advanced,
                        ),
                    ],
                ),
            },
        ];

        Catalog { categories }
    }
}

/// Builds the question list for one category, assigning sequential ids.
fn questions(
    category: &'static str,
    id_prefix: &'static str,
    prompts: &[(&'static str, Difficulty)],
) -> Vec<Question> {
    prompts
        .iter()
        .enumerate()
        .map(|(i, &(prompt, difficulty))| Question {
            id: format!("{}-{}", id_prefix, i + 1),
            prompt,
            category,
            difficulty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_questions_carry_their_category_title() {
        let catalog = Catalog::builtin();
        for category in catalog.categories() {
            for question in &category.questions {
                assert_eq!(question.category, category.title);
            }
        }
    }

    #[test]
    fn test_question_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut seen: HashSet<&str> = HashSet::new();
        for category in catalog.categories() {
            assert!(seen.insert(category.id), "duplicate category id {}", category.id);
            for question in &category.questions {
                assert!(
                    seen.insert(question.id.as_str()),
                    "duplicate question id {}",
                    question.id
                );
            }
        }
    }

    #[test]
    fn test_every_category_has_questions() {
        let catalog = Catalog::builtin();
        assert!(!catalog.categories().is_empty());
        for category in catalog.categories() {
            assert!(!category.questions.is_empty());
            assert!(!category.description.is_empty());
        }
    }

    #[test]
    fn test_difficulty_ids_round_trip() {
        for d in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Advanced,
        ] {
            assert_eq!(Difficulty::from_id(d.id()), Some(d));
        }
        assert_eq!(Difficulty::from_id("expert"), None);
    }

    #[test]
    fn test_algorithms_category_exists_with_beginner_question() {
        let catalog = Catalog::builtin();
        let algorithms = catalog
            .categories()
            .iter()
            .find(|c| c.title == "Algorithms")
            .expect("Algorithms category");
        assert!(algorithms
            .questions
            .iter()
            .any(|q| q.difficulty == Difficulty::Beginner));
    }
}
