pub mod solution_stack;
