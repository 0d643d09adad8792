pub mod reasoning_adapter;
