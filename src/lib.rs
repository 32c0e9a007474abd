pub mod shared {
    pub mod core {
        pub mod ids;
        pub mod notice;
    }
    pub mod infrastructure {
        pub mod api_client;
        pub mod local_store;
    }
}

pub mod modules {
    pub mod auth {
        pub mod core {
            pub mod ports;
            pub mod session;
        }
        pub mod use_cases {
            pub mod manage_session {
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod auth_http;
                pub mod auth_in_memory;
            }
        }
    }

    pub mod committees {
        pub mod core {
            pub mod committee;
            pub mod ports;
        }
        pub mod use_cases {
            pub mod summarize_committees {
                pub mod handler;
                pub mod poller;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod committees_http;
                pub mod committees_in_memory;
            }
        }
    }

    pub mod volunteers {
        pub mod core {
            pub mod assignment;
            pub mod bulk_upload;
            pub mod notes;
            pub mod ports;
            pub mod volunteer;
        }
        pub mod use_cases {
            pub mod enroll_volunteer {
                pub mod handler;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod volunteers_http;
                pub mod volunteers_in_memory;
            }
        }
    }

    pub mod announcements {
        pub mod core {
            pub mod announcement;
            pub mod ports;
        }
        pub mod adapters {
            pub mod outbound {
                pub mod announcements_http;
                pub mod announcements_in_memory;
            }
        }
    }

    pub mod attendance {
        pub mod core {
            pub mod catalog;
            pub mod events;
            pub mod evolve;
            pub mod filter;
            pub mod ports;
            pub mod records;
            pub mod shift;
            pub mod state;
            pub mod view;
        }
        pub mod use_cases {
            pub mod track_attendance {
                pub mod handler;
                pub mod outcome;
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod attendance_http;
                pub mod attendance_in_memory;
            }
        }
    }
}

pub mod shell;
