pub mod affine_frame_normalizer;
