pub mod lofi;
