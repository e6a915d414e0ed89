pub mod mock_editor;
