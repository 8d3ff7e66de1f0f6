pub mod bodies_csv;
pub mod trajectory;
