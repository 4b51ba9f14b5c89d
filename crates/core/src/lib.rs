pub mod shared {
    pub mod canonical_frame;
    pub mod constants;
    pub mod frame;
}

pub mod orientation {
    pub mod domain {
        pub mod affine_transform;
        pub mod frame_normalizer;
        pub mod orientation;
    }
    pub mod infrastructure;
}

pub mod container {
    pub mod domain {
        pub mod container_writer;
        pub mod frame_timing;
    }
    pub mod infrastructure;
}

pub mod encoding {
    pub mod encode_animation_use_case;
    pub mod encode_config;
    pub mod encode_logger;
    pub mod encode_request;
    pub mod encode_result;
    pub mod encode_worker;
    pub mod infrastructure;
    pub mod normalize_executor;
}

pub mod input {
    pub mod infrastructure;
}
