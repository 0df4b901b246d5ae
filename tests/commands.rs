use std::{fmt::Debug, io};

use insta::assert_snapshot;
use jdwp::{
    codec::{CodecError, JdwpReadable, JdwpWritable},
    spec::{
        array_reference, class_type,
        event_request::{self, Modifier},
        method::{self, Line, LineTableReply},
        object_reference,
        reference_type::{self, ConstantPoolReply, Field, InstanceLimit},
        stack_frame,
        thread_group_reference::ChildrenReply,
        thread_reference::{self, FrameLimit, StackDepth},
        virtual_machine::*,
        ClassStatus, Command, CommandId, EventKind, FieldID, FieldModifiers, InvokeMethodReply,
        InvokeOptions, JdwpId, Location, Packet, ReferenceTypeID, StepDepth, StepSize,
        SuspendPolicy, Tag, TaggedObjectID, TaggedReferenceTypeID, ThreadID, TypeTag, UntaggedValue,
        Value,
    },
    Single,
};

mod common;

use common::{decode, encode, hex, round_trip, Result};

fn id<T>(raw: u16) -> T
where
    T: JdwpId,
    T::Raw: From<u16>,
{
    T::from_raw(raw.into())
}

fn check<T>(value: T) -> Result
where
    T: JdwpReadable + JdwpWritable + PartialEq + Debug,
{
    assert_eq!(round_trip(&value)?, value);
    Ok(())
}

fn command_bytes<C: Command + JdwpWritable>(command: &C) -> Result<String> {
    let packet = Packet::command(7, command, IDSizeInfo::uniform(4), None)?;
    let mut bytes = Vec::new();
    packet.write_to(&mut bytes)?;
    Ok(hex(&bytes))
}

#[test]
fn command_ids() {
    assert_eq!(Version::ID, CommandId::new(1, 1));
    assert_eq!(IDSizes::ID, CommandId::new(1, 7));
    assert_eq!(AllModules::ID, CommandId::new(1, 22));
    assert_eq!(reference_type::Module::ID, CommandId::new(2, 19));
    assert_eq!(thread_reference::IsVirtual::ID, CommandId::new(11, 15));
    assert_eq!(event_request::Set::ID, CommandId::new(15, 1));

    assert_eq!(
        CommandId::new(11, 13).to_string(),
        "ThreadReference.OwnedMonitorsStackDepthInfo (11.13)"
    );
    assert_eq!(CommandId::new(1, 99).to_string(), "1.99");
    assert_eq!(CommandId::new(1, 99).name(), None);
}

#[test]
fn parameterless_command_has_an_empty_body() -> Result {
    assert_snapshot!(command_bytes(&Version)?, @"0000000b 00000007 000101");
    assert_snapshot!(command_bytes(&AllThreads)?, @"0000000b 00000007 000104");
    Ok(())
}

#[test]
fn string_parameter() -> Result {
    let command = ClassesBySignature::new("Ljava/lang/String;");
    assert_eq!(command.signature, "Ljava/lang/String;");
    check(command.clone())?;
    assert_snapshot!(
        command_bytes(&ClassesBySignature::new("LA;"))?,
        @"00000012 00000007 00010200 0000034c 413b"
    );
    Ok(())
}

#[test]
fn version_reply() -> Result {
    check(VersionReply {
        description: "Java Debug Wire Protocol (Reference Implementation) version 21.0".into(),
        version_major: 21,
        version_minor: 0,
        vm_version: "21.0.2+13".into(),
        vm_name: "OpenJDK 64-Bit Server VM".into(),
    })
}

#[test]
fn empty_and_populated_groups() -> Result {
    check(Vec::<(TaggedReferenceTypeID, ClassStatus)>::new())?;
    check(vec![
        (
            TaggedReferenceTypeID::new(TypeTag::Class, id(10)),
            ClassStatus::OK,
        ),
        (
            TaggedReferenceTypeID::new(TypeTag::Array, id(11)),
            ClassStatus::INITIALIZED | ClassStatus::ERROR,
        ),
    ])?;

    let sizes = IDSizeInfo::default();
    assert_eq!(encode(&Vec::<ThreadID>::new(), sizes)?, [0, 0, 0, 0]);
    assert_eq!(decode::<Vec<ThreadID>>(&[0, 0, 0, 0], sizes)?, vec![]);
    Ok(())
}

#[test]
fn id_sizes_reply() -> Result {
    let sizes = IDSizeInfo {
        field_id_size: 8,
        method_id_size: 8,
        object_id_size: 8,
        reference_type_id_size: 8,
        frame_id_size: 4,
    };
    check(sizes)?;
    assert!(sizes.validate().is_ok());
    assert!(IDSizeInfo::uniform(0).validate().is_err());
    assert!(IDSizeInfo::uniform(9).validate().is_err());
    Ok(())
}

#[test]
fn capabilities_new_keeps_reserved_bits() -> Result {
    let mut bytes = vec![1; 32];
    bytes[2] = 0;
    let reply = decode::<CapabilitiesNewReply>(&bytes, IDSizeInfo::default())?;

    assert!(reply.capabilities.can_watch_field_modification);
    assert!(!reply.capabilities.can_get_bytecodes);
    assert!(reply.can_force_early_return);
    assert_eq!(encode(&reply, IDSizeInfo::default())?, bytes);
    Ok(())
}

#[test]
fn instance_counts_keep_the_collection_shape() -> Result {
    let command = InstanceCounts::new([id::<ReferenceTypeID>(1), id(2)]);
    check(command)?;

    let counts: [u64; 2] = decode(
        &[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 0, 0, 0, 0, 6],
        IDSizeInfo::default(),
    )?;
    assert_eq!(counts, [5, 6]);
    Ok(())
}

#[test]
fn dispose_objects() -> Result {
    let command = DisposeObjects::new(vec![(id(1), 1), (id(2), 3)]);
    assert_snapshot!(
        command_bytes(&command)?,
        @"0000001f 00000007 00010e00 00000200 00000100 00000100 00000200 000003"
    );
    check(command)
}

#[test]
fn reference_type_replies() -> Result {
    check(vec![Field {
        field_id: id(1),
        name: "count".into(),
        signature: "I".into(),
        mod_bits: FieldModifiers::PRIVATE | FieldModifiers::STATIC,
    }])?;
    check(reference_type::SignatureWithGenericReply {
        signature: "Ljava/util/List;".into(),
        generic_signature: Some("<E:Ljava/lang/Object;>Ljava/lang/Object;".into()),
    })?;
    check(reference_type::SignatureWithGenericReply {
        signature: "Ljava/lang/Object;".into(),
        generic_signature: None,
    })?;
    check(ConstantPoolReply {
        count: 3,
        bytes: vec![1, 0, 1, b'A', 7, 0, 1],
    })?;
    check(reference_type::ClassFileVersionReply {
        major_version: 65,
        minor_version: 0,
    })
}

#[test]
fn constant_pool_debug_is_hex() {
    let reply = ConstantPoolReply {
        count: 2,
        bytes: vec![0xca, 0xfe],
    };
    assert_eq!(
        format!("{reply:?}"),
        "ConstantPoolReply { count: 2, bytes: cafe }"
    );
}

#[test]
fn static_field_values() -> Result {
    let single = reference_type::GetValues::new(id(1), Single(id::<FieldID>(2)));
    check(single)?;

    let values: Single<Value> = decode(&[0, 0, 0, 1, b'Z', 1], IDSizeInfo::default())?;
    assert_eq!(values.0, Value::Boolean(true));

    check(object_reference::GetValues::new(id(1), vec![id::<FieldID>(2), id(3)]))
}

#[test]
fn instance_limit() -> Result {
    assert_eq!(InstanceLimit::limit(0), InstanceLimit::All);
    check(reference_type::Instances::new(id(1), InstanceLimit::limit(10)))?;

    let bytes = encode(&InstanceLimit::All, IDSizeInfo::default())?;
    assert_eq!(bytes, [0, 0, 0, 0]);
    Ok(())
}

#[test]
fn set_values_are_untagged() -> Result {
    let command = class_type::SetValues::new(
        id(1),
        vec![
            (id(2), UntaggedValue::from(5i32)),
            (id(3), Value::Object(id(4)).into()),
        ],
    );
    let bytes = encode(&command, IDSizeInfo::uniform(2))?;
    assert_snapshot!(hex(&bytes), @"00010000 00020002 00000005 00030004");

    let command = array_reference::SetValues::new(id(9), 1, vec![true.into(), false.into()]);
    let bytes = encode(&command, IDSizeInfo::uniform(2))?;
    assert_snapshot!(hex(&bytes), @"00090000 00010000 00020100");

    let command = object_reference::SetValues::new(id(1), vec![(id(2), UntaggedValue::from('x' as u16))]);
    let bytes = encode(&command, IDSizeInfo::uniform(2))?;
    assert_snapshot!(hex(&bytes), @"00010000 00010002 0078");
    Ok(())
}

#[test]
fn invoke_method() -> Result {
    let command = class_type::InvokeMethod::new(
        id(1),
        id(2),
        id(3),
        vec![Value::Int(1), Value::String(id(4))],
        InvokeOptions::SINGLE_THREADED,
    );
    check(command)?;

    let threw = InvokeMethodReply {
        return_value: Value::Object(id(0)),
        exception: Some(TaggedObjectID::Object(id(5))),
    };
    check(threw.clone())?;
    assert_eq!(threw.result(), Err(TaggedObjectID::Object(id(5))));

    let returned = InvokeMethodReply {
        return_value: Value::Long(3),
        exception: None,
    };
    assert_eq!(round_trip(&returned)?.result(), Ok(Value::Long(3)));
    Ok(())
}

#[test]
fn line_table() -> Result {
    check(method::LineTable::new(id(1), id(2)))?;
    check(LineTableReply {
        start: 0,
        end: 10,
        lines: vec![
            Line {
                line_code_index: 0,
                line_number: 3,
            },
            Line {
                line_code_index: 4,
                line_number: 4,
            },
        ],
    })?;
    check(LineTableReply {
        start: -1,
        end: -1,
        lines: vec![],
    })
}

#[test]
fn monitor_info_without_owner() -> Result {
    let reply = object_reference::MonitorInfoReply {
        owner: None,
        entry_count: 0,
        waiters: vec![id(3)],
    };
    check(reply.clone())?;
    let bytes = encode(&reply, IDSizeInfo::uniform(1))?;
    assert_snapshot!(hex(&bytes), @"00000000 00000000 0103");
    Ok(())
}

#[test]
fn thread_frames() -> Result {
    check(thread_reference::Frames::new(id(1), 0, FrameLimit::AllRemaining))?;
    check(thread_reference::Frames::new(id(1), 2, FrameLimit::Limit(5)))?;

    let all = encode(&FrameLimit::AllRemaining, IDSizeInfo::default())?;
    assert_eq!(all, [0xff; 4]);

    let err = decode::<FrameLimit>(&(-2i32).to_be_bytes(), IDSizeInfo::default()).unwrap_err();
    assert_eq!(err.to_string(), "unknown FrameLimit discriminant -2");

    let location = Location {
        reference_id: TaggedReferenceTypeID::new(TypeTag::Class, id(4)),
        method_id: id(5),
        index: 12,
    };
    check(vec![(id::<jdwp::spec::FrameID>(1), location)])
}

#[test]
fn thread_status_and_monitors() -> Result {
    use jdwp::spec::{SuspendStatus, ThreadStatus};

    check((ThreadStatus::Sleeping, SuspendStatus::Suspended))?;
    check(vec![
        (TaggedObjectID::Object(id(1)), StackDepth::Depth(0)),
        (TaggedObjectID::String(id(2)), StackDepth::Unknown),
    ])?;
    check(None::<TaggedObjectID>)
}

#[test]
fn counts_beyond_a_java_int_are_rejected() -> Result {
    let sizes = IDSizeInfo::default();
    check(FrameLimit::Limit(i32::MAX as u32))?;
    check(StackDepth::Depth(i32::MAX as u32))?;

    // u32::MAX would go out as -1 and mean something else entirely
    for err in [
        encode(&FrameLimit::Limit(u32::MAX), sizes).unwrap_err(),
        encode(&FrameLimit::Limit(1 << 31), sizes).unwrap_err(),
        encode(&StackDepth::Depth(u32::MAX), sizes).unwrap_err(),
    ] {
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(matches!(
            CodecError::from_io(&err),
            Some(CodecError::OutOfRange { .. })
        ));
    }

    let command = thread_reference::Frames::new(id(1), 0, FrameLimit::Limit(u32::MAX));
    assert!(Packet::command(1, &command, sizes, None).is_err());
    Ok(())
}

#[test]
fn stop_takes_an_untagged_throwable() -> Result {
    let command = thread_reference::Stop::new(id(1), id(2));
    let bytes = encode(&command, IDSizeInfo::uniform(1))?;
    assert_eq!(bytes, [1, 2]);
    check(command)
}

#[test]
fn thread_group_children() -> Result {
    check(ChildrenReply {
        child_threads: vec![id(1), id(2)],
        child_groups: vec![],
    })
}

#[test]
fn stack_frame_slots() -> Result {
    let command = stack_frame::GetValues::new(id(1), id(2), vec![(0u32, Tag::Int), (1, Tag::Object)]);
    check(command)?;

    let command = stack_frame::SetValues::new(id(1), id(2), vec![(3, Value::Double(0.5))]);
    check(command)
}

#[test]
fn array_region_reply() -> Result {
    check(array_reference::GetValues::new(id(1), 0, 2))?;
    check(jdwp::spec::ArrayRegion::Long(vec![1, 2]))
}

#[test]
fn event_request_with_modifiers() -> Result {
    let location = Location {
        reference_id: TaggedReferenceTypeID::new(TypeTag::Class, id(1)),
        method_id: id(2),
        index: 3,
    };
    let command = event_request::Set::new(
        EventKind::Breakpoint,
        SuspendPolicy::All,
        vec![
            Modifier::LocationOnly { location },
            Modifier::Count { count: 2 },
        ],
    );
    let bytes = encode(&command, IDSizeInfo::uniform(1))?;
    assert_snapshot!(hex(&bytes), @"02020000 00020701 01020000 00000000 00030100 000002");
    check(command)
}

#[test]
fn every_modifier_round_trips() -> Result {
    let modifiers = vec![
        Modifier::Count { count: 1 },
        Modifier::Conditional { expr_id: 2 },
        Modifier::ThreadOnly { thread: id(3) },
        Modifier::ClassOnly { class: id(4) },
        Modifier::ClassMatch {
            pattern: "java.*".into(),
        },
        Modifier::ClassExclude {
            pattern: "*.Test".into(),
        },
        Modifier::LocationOnly {
            location: Location {
                reference_id: TaggedReferenceTypeID::new(TypeTag::Interface, id(5)),
                method_id: id(6),
                index: 0,
            },
        },
        Modifier::ExceptionOnly {
            exception: None,
            caught: false,
            uncaught: true,
        },
        Modifier::FieldOnly {
            declaring: id(7),
            field_id: id(8),
        },
        Modifier::Step {
            thread: id(9),
            size: StepSize::Line,
            depth: StepDepth::Over,
        },
        Modifier::InstanceOnly { object: id(10) },
        Modifier::SourceNameMatch {
            pattern: "Main.kt".into(),
        },
    ];
    for (modifier, kind) in modifiers.iter().zip(1u8..) {
        assert_eq!(modifier.kind() as u8, kind);
    }
    check(modifiers)
}

#[test]
fn exception_modifier_field_order() -> Result {
    let modifier = Modifier::ExceptionOnly {
        exception: Some(id(1)),
        caught: true,
        uncaught: false,
    };
    let bytes = encode(&modifier, IDSizeInfo::uniform(1))?;
    // kind, reference type, caught, uncaught
    assert_eq!(bytes, [8, 1, 1, 0]);
    Ok(())
}

#[test]
fn unknown_modifier_kind() {
    let err = decode::<Modifier>(&[13], IDSizeInfo::default()).unwrap_err();
    assert_eq!(err.to_string(), "unknown Modifier discriminant 13");
}

#[test]
fn clear_request() -> Result {
    let command = event_request::Clear::new(EventKind::Breakpoint, id(4));
    let bytes = encode(&command, IDSizeInfo::default())?;
    assert_eq!(bytes, [2, 0, 0, 0, 4]);
    check(command)?;
    check(event_request::ClearAllBreakpoints)
}

/// Round-trips every listed value through 8 byte identifiers.
macro_rules! round_trips {
    ($($value:expr),* $(,)?) => {{
        $(check($value)?;)*
    }};
}

#[test]
fn virtual_machine_set() -> Result {
    let class = TaggedReferenceTypeID::new(TypeTag::Class, id(1));
    round_trips![
        Exit::new(-1),
        CreateString::new(""),
        CreateString::new("hello"),
        SetDefaultStratum::new(""),
        SetDefaultStratum::new("Kotlin"),
        RedefineClasses::new(vec![]),
        RedefineClasses::new(vec![(id(1), vec![0xca, 0xfe, 0xba, 0xbe]), (id(2), vec![])]),
        Vec::<Class>::new(),
        vec![Class {
            type_id: class,
            signature: "LMain;".into(),
            status: ClassStatus::OK,
        }],
        vec![
            GenericClass {
                type_id: class,
                signature: "LMain;".into(),
                generic_signature: None,
                status: ClassStatus::VERIFIED,
            },
            GenericClass {
                type_id: TaggedReferenceTypeID::new(TypeTag::Interface, id(2)),
                signature: "Ljava/util/List;".into(),
                generic_signature: Some("<E:Ljava/lang/Object;>".into()),
                status: ClassStatus::OK,
            },
        ],
        CapabilitiesReply {
            can_watch_field_modification: true,
            can_watch_field_access: false,
            can_get_bytecodes: true,
            can_get_synthetic_attribute: false,
            can_get_owned_monitor_info: true,
            can_get_current_contended_monitor: false,
            can_get_monitor_info: true,
        },
        ClassPathsReply {
            base_dir: String::new(),
            classpaths: vec![],
            bootclasspaths: vec![],
        },
        ClassPathsReply {
            base_dir: "/srv/app".into(),
            classpaths: vec!["lib/a.jar".into(), "classes".into()],
            bootclasspaths: vec!["/jdk/lib/modules".into()],
        },
    ];
    Ok(())
}

#[test]
fn absent_generic_signature_is_an_empty_string() -> Result {
    let class = GenericClass {
        type_id: TaggedReferenceTypeID::new(TypeTag::Class, id(1)),
        signature: "LMain;".into(),
        generic_signature: Some(String::new()),
        status: ClassStatus::OK,
    };
    let sizes = IDSizeInfo::uniform(1);
    let bytes = encode(&class, sizes)?;
    let absent = GenericClass {
        generic_signature: None,
        ..class.clone()
    };
    assert_eq!(bytes, encode(&absent, sizes)?);
    assert_eq!(decode::<GenericClass>(&bytes, sizes)?, absent);
    Ok(())
}

#[test]
fn reference_type_set() -> Result {
    use jdwp::spec::{
        reference_type::{FieldWithGeneric, Method, MethodWithGeneric},
        MethodModifiers,
    };

    round_trips![
        reference_type::Methods::new(id(1)),
        reference_type::FieldsWithGeneric::new(id(1)),
        reference_type::MethodsWithGeneric::new(id(1)),
        Vec::<Method>::new(),
        vec![Method {
            method_id: id(2),
            name: "<init>".into(),
            signature: "()V".into(),
            mod_bits: MethodModifiers::PUBLIC,
        }],
        vec![FieldWithGeneric {
            field_id: id(3),
            name: "items".into(),
            signature: "Ljava/util/List;".into(),
            generic_signature: Some("Ljava/util/List<Ljava/lang/String;>;".into()),
            mod_bits: FieldModifiers::PRIVATE | FieldModifiers::FINAL,
        }],
        vec![
            MethodWithGeneric {
                method_id: id(4),
                name: "get".into(),
                signature: "(I)Ljava/lang/Object;".into(),
                generic_signature: Some("(I)TE;".into()),
                mod_bits: MethodModifiers::PUBLIC | MethodModifiers::SYNCHRONIZED,
            },
            MethodWithGeneric {
                method_id: id(5),
                name: "size".into(),
                signature: "()I".into(),
                generic_signature: None,
                mod_bits: MethodModifiers::empty(),
            },
        ],
    ];
    Ok(())
}

#[test]
fn method_variable_tables() -> Result {
    use jdwp::spec::method::{
        Variable, VariableTable, VariableTableReply, VariableTableWithGeneric,
        VariableTableWithGenericReply, VariableWithGeneric,
    };

    round_trips![
        VariableTable::new(id(1), id(2)),
        VariableTableWithGeneric::new(id(1), id(2)),
        VariableTableReply {
            arg_cnt: 0,
            variables: vec![],
        },
        VariableTableReply {
            arg_cnt: 1,
            variables: vec![
                Variable {
                    code_index: 0,
                    name: "this".into(),
                    signature: "LMain;".into(),
                    length: 12,
                    slot: 0,
                },
                Variable {
                    code_index: 4,
                    name: "i".into(),
                    signature: "I".into(),
                    length: 8,
                    slot: 1,
                },
            ],
        },
        VariableTableWithGenericReply {
            arg_cnt: 2,
            variables: vec![VariableWithGeneric {
                code_index: 0,
                name: "list".into(),
                signature: "Ljava/util/List;".into(),
                generic_signature: Some("Ljava/util/List<TT;>;".into()),
                length: 20,
                slot: 1,
            }],
        },
    ];
    Ok(())
}

#[test]
fn invocations_and_instances() -> Result {
    use jdwp::spec::{array_type, interface_type, NewInstanceReply};

    let arguments = vec![Value::Int(1), Value::String(id(2))];
    round_trips![
        class_type::NewInstance::new(id(1), id(2), id(3), vec![], InvokeOptions::empty()),
        array_type::NewInstance::new(id(1), 0),
        array_type::NewInstance::new(id(1), 16),
        interface_type::InvokeMethod::new(
            id(1),
            id(2),
            id(3),
            arguments.clone(),
            InvokeOptions::SINGLE_THREADED,
        ),
        object_reference::InvokeMethod::new(
            id(1),
            id(2),
            id(3),
            id(4),
            arguments,
            InvokeOptions::SINGLE_THREADED | InvokeOptions::NONVIRTUAL,
        ),
        NewInstanceReply {
            new_object: Some(TaggedObjectID::Object(id(5))),
            exception: None,
        },
        NewInstanceReply {
            new_object: None,
            exception: Some(TaggedObjectID::Object(id(6))),
        },
    ];
    Ok(())
}

#[test]
fn object_and_module_references() -> Result {
    use jdwp::spec::{class_loader_reference, class_object_reference, module_reference};

    round_trips![
        object_reference::ReferringObjects::new(id(1), InstanceLimit::All),
        object_reference::ReferringObjects::new(id(1), InstanceLimit::limit(3)),
        module_reference::Name::new(id(1)),
        module_reference::ClassLoader::new(id(1)),
        class_loader_reference::VisibleClasses::new(id(1)),
        class_object_reference::ReflectedType::new(id(1)),
        vec![
            TaggedReferenceTypeID::new(TypeTag::Class, id(2)),
            TaggedReferenceTypeID::new(TypeTag::Array, id(3)),
        ],
        Some(jdwp::spec::ClassLoaderID::from_raw(4)),
        None::<jdwp::spec::ClassLoaderID>,
    ];
    Ok(())
}

#[test]
fn frames_and_early_return() -> Result {
    round_trips![
        stack_frame::ThisObject::new(id(1), id(2)),
        stack_frame::PopFrames::new(id(1), id(2)),
        thread_reference::ForceEarlyReturn::new(id(1), Value::Void),
        thread_reference::ForceEarlyReturn::new(id(1), Value::Long(-7)),
        Some(TaggedObjectID::Object(id(3))),
    ];
    Ok(())
}
